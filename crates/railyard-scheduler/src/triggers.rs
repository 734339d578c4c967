//! Trigger classification.

use railyard_core::trigger::{ClassifiedTrigger, RawEvent, TriggerKind};
use railyard_core::version::BumpRequest;
use railyard_core::{Error, Result};
use tracing::debug;

/// Maps a raw event onto exactly one trigger kind.
pub struct TriggerClassifier;

impl TriggerClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a raw event, rejecting contradictory signals.
    pub fn classify(&self, event: &RawEvent) -> Result<ClassifiedTrigger> {
        let wants_bump = event.bump || !event.bump_requests.is_empty();

        if event.local && event.pr_number.is_some() {
            return Err(invalid("local invocation cannot carry a pull request number"));
        }
        if event.local && wants_bump {
            return Err(invalid("local invocation cannot request a version bump"));
        }
        if event.pr_number.is_some() && wants_bump {
            return Err(invalid("pull request event cannot request a version bump"));
        }
        if event.local && event.commit_range.is_some() {
            return Err(invalid("local invocation cannot carry a commit range"));
        }
        if !event.local && !event.targets.is_empty() {
            return Err(invalid("explicit targets are only accepted on local invocations"));
        }

        let kind = if event.local {
            TriggerKind::Local
        } else if event.pr_number.is_some() {
            TriggerKind::PullRequest
        } else if wants_bump {
            TriggerKind::Bump
        } else {
            TriggerKind::Commit
        };

        let branch = event
            .branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);
        if kind != TriggerKind::Local && branch.is_none() {
            return Err(invalid(&format!("{} event requires a branch", kind)));
        }
        if kind == TriggerKind::Bump && event.bump_requests.is_empty() {
            return Err(invalid("bump event carries no bump requests"));
        }

        debug!(
            trigger = %kind,
            branch = branch.as_deref().unwrap_or("-"),
            targets = event.targets.len(),
            "Classified trigger"
        );

        Ok(ClassifiedTrigger {
            kind,
            branch,
            pr_number: event.pr_number,
            commit_range: event
                .commit_range
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            explicit_targets: event.targets.iter().cloned().collect(),
            bump_requests: event.bump_requests.clone(),
        })
    }
}

impl Default for TriggerClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidTrigger(reason.to_string())
}

/// Extract `[bump app:part ...]` directives from a commit message.
///
/// Several directives may share one bracket, separated by whitespace or
/// commas: `[bump core:minor, web:prerelease=rc.1]`.
pub fn parse_commit_directives(message: &str) -> Result<Vec<BumpRequest>> {
    let mut requests = Vec::new();
    let mut rest = message;

    while let Some(start) = rest.find("[bump") {
        let after = &rest[start + "[bump".len()..];
        let Some(end) = after.find(']') else {
            return Err(invalid("unterminated [bump ...] directive"));
        };
        // `[bumpy]` and friends are not directives.
        let body = &after[..end];
        if body.starts_with(|c: char| c.is_whitespace()) {
            for directive in body.split(|c: char| c.is_whitespace() || c == ',') {
                if !directive.is_empty() {
                    requests.push(directive.parse()?);
                }
            }
        }
        rest = &after[end + 1..];
    }

    Ok(requests)
}
