//! Semantic version bumping.

use railyard_core::version::{BumpRequest, VersionPart};
use railyard_core::{Error, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::collections::BTreeSet;
use tracing::debug;

/// Computes next versions from bump requests.
pub struct VersionBumpEngine;

impl VersionBumpEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply a single request to `current`.
    ///
    /// Release-triplet bumps reset lower-order parts and clear any
    /// prerelease label; prerelease bumps leave the triplet untouched.
    pub fn bump(&self, current: &Version, request: &BumpRequest) -> Result<Version> {
        let mut next = current.clone();
        next.build = BuildMetadata::EMPTY;

        match request.part {
            VersionPart::Prerelease => {
                next.pre = if request.is_increment {
                    next_prerelease(&current.pre, request)?
                } else {
                    let label = assign_value(request)?;
                    Prerelease::new(label.trim()).map_err(|e| {
                        Error::invalid_bump(
                            request.app_id.as_str(),
                            format!("invalid prerelease label '{}': {}", label, e),
                        )
                    })?
                };
            }
            part => {
                let slot = match part {
                    VersionPart::Major => current.major,
                    VersionPart::Minor => current.minor,
                    _ => current.patch,
                };
                let value = if request.is_increment {
                    slot.checked_add(1).ok_or_else(|| {
                        Error::invalid_bump(
                            request.app_id.as_str(),
                            format!("{} overflows at {}", part, slot),
                        )
                    })?
                } else {
                    parse_numeric(request)?
                };

                match part {
                    VersionPart::Major => {
                        next.major = value;
                        next.minor = 0;
                        next.patch = 0;
                    }
                    VersionPart::Minor => {
                        next.minor = value;
                        next.patch = 0;
                    }
                    _ => next.patch = value,
                }
                next.pre = Prerelease::EMPTY;
            }
        }

        Ok(next)
    }

    /// Apply every request for one application.
    ///
    /// Requests are ordered by rank (highest first), then by part (highest
    /// order first). Only the first request per part survives, so the
    /// highest rank wins a conflict and the first-declared request wins a
    /// tie.
    pub fn bump_all(&self, current: &Version, requests: &[BumpRequest]) -> Result<Version> {
        let mut ordered: Vec<&BumpRequest> = requests.iter().collect();
        ordered.sort_by(|a, b| b.rank.cmp(&a.rank).then(a.part.cmp(&b.part)));

        let mut seen = BTreeSet::new();
        ordered.retain(|request| seen.insert(request.part));

        ordered.into_iter().try_fold(current.clone(), |version, request| {
            let next = self.bump(&version, request)?;
            debug!(app = %request.app_id, request = %request, from = %version, to = %next, "Applied bump");
            Ok(next)
        })
    }
}

impl Default for VersionBumpEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_value(request: &BumpRequest) -> Result<&str> {
    request.assign_value.as_deref().ok_or_else(|| {
        Error::invalid_bump(
            request.app_id.as_str(),
            format!("{} assignment without a value", request.part),
        )
    })
}

fn parse_numeric(request: &BumpRequest) -> Result<u64> {
    let raw = assign_value(request)?.trim();
    if raw.starts_with('-') {
        return Err(Error::invalid_bump(
            request.app_id.as_str(),
            format!("negative {} value {}", request.part, raw),
        ));
    }
    raw.parse::<u64>().map_err(|_| {
        Error::invalid_bump(
            request.app_id.as_str(),
            format!("{} value '{}' is not a number", request.part, raw),
        )
    })
}

/// `beta.1 -> beta.2`, `beta -> beta.1`, empty -> `1`.
fn next_prerelease(pre: &Prerelease, request: &BumpRequest) -> Result<Prerelease> {
    let label = pre.as_str();
    let next = if label.is_empty() {
        "1".to_string()
    } else {
        match label.rsplit_once('.') {
            Some((head, tail)) if is_numeric(tail) => format!("{}.{}", head, increment(tail, request)?),
            _ if is_numeric(label) => increment(label, request)?.to_string(),
            _ => format!("{}.1", label),
        }
    };

    Prerelease::new(&next).map_err(|e| Error::invalid_bump(request.app_id.as_str(), e.to_string()))
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn increment(counter: &str, request: &BumpRequest) -> Result<u64> {
    counter
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| {
            Error::invalid_bump(
                request.app_id.as_str(),
                format!("prerelease counter {} overflows", counter),
            )
        })
}
