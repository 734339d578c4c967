//! Trigger events, trigger kinds, and workflow strategy flags.

use crate::flags::flag_set;
use crate::ids::EntryId;
use crate::version::BumpRequest;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

flag_set! {
    /// The set of trigger kinds an entry accepts.
    pub struct TriggerFlags;
    pub enum TriggerFlag {
        Local = LOCAL = 0b0_0001,
        PullRequest = PULL_REQUEST = 0b0_0010,
        Commit = COMMIT = 0b0_0100,
        Bump = BUMP = 0b0_1000,
        /// Entry may run when explicitly named as a target of a local run.
        Target = TARGET = 0b1_0000,
    }
}

flag_set! {
    /// Concurrency strategy applied when grouping run entries.
    pub struct WorkflowStrategy;
    pub enum StrategyFlag {
        SynchronousAppId = SYNCHRONOUS_APP_ID = 0b01,
        SynchronousEntryType = SYNCHRONOUS_ENTRY_TYPE = 0b10,
    }
}

/// The classified reason an orchestration run is happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Local,
    PullRequest,
    Commit,
    Bump,
}

impl TriggerKind {
    pub fn flag(&self) -> TriggerFlags {
        match self {
            TriggerKind::Local => TriggerFlags::LOCAL,
            TriggerKind::PullRequest => TriggerFlags::PULL_REQUEST,
            TriggerKind::Commit => TriggerFlags::COMMIT,
            TriggerKind::Bump => TriggerFlags::BUMP,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Local => "local",
            TriggerKind::PullRequest => "pull_request",
            TriggerKind::Commit => "commit",
            TriggerKind::Bump => "bump",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw description of the event that started a run, as gathered from git
/// and CI context before classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub pr_number: Option<u64>,
    #[serde(default)]
    pub commit_range: Option<String>,
    /// Explicit bump flag; bump requests imply it.
    #[serde(default)]
    pub bump: bool,
    #[serde(default)]
    pub bump_requests: Vec<BumpRequest>,
    #[serde(default)]
    pub targets: Vec<EntryId>,
}

impl RawEvent {
    pub fn local() -> Self {
        Self {
            local: true,
            ..Default::default()
        }
    }

    pub fn commit(branch: impl Into<String>) -> Self {
        Self {
            branch: Some(branch.into()),
            ..Default::default()
        }
    }

    pub fn pull_request(branch: impl Into<String>, pr_number: u64) -> Self {
        Self {
            branch: Some(branch.into()),
            pr_number: Some(pr_number),
            ..Default::default()
        }
    }

    pub fn bump(branch: impl Into<String>, requests: Vec<BumpRequest>) -> Self {
        Self {
            branch: Some(branch.into()),
            bump: true,
            bump_requests: requests,
            ..Default::default()
        }
    }

    pub fn with_commit_range(mut self, range: impl Into<String>) -> Self {
        self.commit_range = Some(range.into());
        self
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = impl Into<EntryId>>) -> Self {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }
}

/// A trigger event after classification. Exactly one kind is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassifiedTrigger {
    pub kind: TriggerKind,
    pub branch: Option<String>,
    pub pr_number: Option<u64>,
    /// Git revision range the event covers, e.g. `abc123..def456`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_range: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub explicit_targets: BTreeSet<EntryId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bump_requests: Vec<BumpRequest>,
}

impl ClassifiedTrigger {
    pub fn is_targeted(&self, id: &EntryId) -> bool {
        self.explicit_targets.contains(id)
    }
}
