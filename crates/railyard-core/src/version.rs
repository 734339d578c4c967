//! Version bump requests and release records.

use crate::ids::AppId;
use crate::{Error, Result};
use schemars::JsonSchema;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Part of a semantic version a bump request targets, ordered from the
/// highest-order part down.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum VersionPart {
    Major,
    Minor,
    Patch,
    Prerelease,
}

impl VersionPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionPart::Major => "major",
            VersionPart::Minor => "minor",
            VersionPart::Patch => "patch",
            VersionPart::Prerelease => "prerelease",
        }
    }
}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionPart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(VersionPart::Major),
            "minor" => Ok(VersionPart::Minor),
            "patch" => Ok(VersionPart::Patch),
            "prerelease" | "pre" => Ok(VersionPart::Prerelease),
            other => Err(Error::invalid_bump(
                s,
                format!("unknown version part: {}", other),
            )),
        }
    }
}

/// An instruction to advance one application's version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BumpRequest {
    pub app_id: AppId,
    pub part: VersionPart,
    /// Add one to `part` when true; assign `assign_value` otherwise.
    #[serde(default = "default_increment")]
    pub is_increment: bool,
    /// Numeric value for release parts, a prerelease label for `prerelease`.
    #[serde(default)]
    pub assign_value: Option<String>,
    /// Orders simultaneous requests for the same application; highest first.
    #[serde(default)]
    pub rank: i32,
}

fn default_increment() -> bool {
    true
}

impl BumpRequest {
    pub fn increment(app_id: impl Into<AppId>, part: VersionPart) -> Self {
        Self {
            app_id: app_id.into(),
            part,
            is_increment: true,
            assign_value: None,
            rank: 0,
        }
    }

    pub fn assign(app_id: impl Into<AppId>, part: VersionPart, value: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            part,
            is_increment: false,
            assign_value: Some(value.into()),
            rank: 0,
        }
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }
}

/// Parses the directive syntax `app:part[=value][@rank]`, e.g. `core:minor`,
/// `core:prerelease=rc.1` or `web:patch@2`.
impl FromStr for BumpRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid =
            |app: &str, reason: &str| Error::invalid_bump(app, format!("'{}': {}", s, reason));

        let (body, rank) = match s.rsplit_once('@') {
            Some((body, rank)) => (body, Some(rank)),
            None => (s, None),
        };

        let Some((app, rest)) = body.split_once(':') else {
            return Err(invalid(s.trim(), "expected app:part"));
        };
        let app = app.trim();
        if app.is_empty() {
            return Err(invalid(s.trim(), "missing application id"));
        }

        let rank = match rank {
            Some(rank) => rank
                .trim()
                .parse::<i32>()
                .map_err(|_| invalid(app, "rank must be an integer"))?,
            None => 0,
        };

        let (part, value) = match rest.split_once('=') {
            Some((part, value)) => (part, Some(value.trim().to_string())),
            None => (rest, None),
        };
        let part: VersionPart = part
            .trim()
            .parse()
            .map_err(|_| invalid(app, &format!("unknown version part: {}", part.trim())))?;

        Ok(BumpRequest {
            app_id: AppId::new(app),
            part,
            is_increment: value.is_none(),
            assign_value: value,
            rank,
        })
    }
}

impl fmt::Display for BumpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.app_id, self.part)?;
        if let Some(value) = self.assign_value.as_deref().filter(|_| !self.is_increment) {
            write!(f, "={}", value)?;
        }
        if self.rank != 0 {
            write!(f, "@{}", self.rank)?;
        }
        Ok(())
    }
}

/// What release history knows about one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReleaseRecord {
    /// Last released version, if any.
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub has_release: bool,
}

impl ReleaseRecord {
    pub fn released(version: Version) -> Self {
        Self {
            version: Some(version),
            has_release: true,
        }
    }

    pub fn unreleased() -> Self {
        Self::default()
    }

    /// Version a run starts from: the last release, or `0.0.0`.
    pub fn current_version(&self) -> Version {
        self.version.clone().unwrap_or_else(|| Version::new(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_increment_directive() {
        let request: BumpRequest = "core:minor".parse().unwrap();
        assert_eq!(request, BumpRequest::increment("core", VersionPart::Minor));
    }

    #[test]
    fn test_parse_assign_directive_with_rank() {
        let request: BumpRequest = "web:prerelease=rc.1@3".parse().unwrap();
        assert_eq!(request.app_id.as_str(), "web");
        assert_eq!(request.part, VersionPart::Prerelease);
        assert!(!request.is_increment);
        assert_eq!(request.assign_value.as_deref(), Some("rc.1"));
        assert_eq!(request.rank, 3);
        assert_eq!(request.to_string(), "web:prerelease=rc.1@3");
    }

    fn bump_error_app(directive: &str) -> String {
        match directive.parse::<BumpRequest>() {
            Err(Error::InvalidBump { app_id, .. }) => app_id,
            other => panic!("expected InvalidBump for {directive:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_malformed_directives() {
        assert_eq!(bump_error_app("core"), "core");
        assert_eq!(bump_error_app(":patch"), ":patch");
        assert_eq!(bump_error_app("core:micro"), "core");
        assert_eq!(bump_error_app("core:patch@high"), "core");
    }

    #[test]
    fn test_unknown_part_is_invalid_bump() {
        assert!(matches!(
            "micro".parse::<VersionPart>(),
            Err(Error::InvalidBump { reason, .. }) if reason.contains("micro")
        ));
    }

    #[test]
    fn test_release_record_current_version() {
        assert_eq!(ReleaseRecord::unreleased().current_version(), Version::new(0, 0, 0));
        let record = ReleaseRecord::released(Version::new(1, 4, 9));
        assert_eq!(record.current_version(), Version::new(1, 4, 9));
    }
}
