//! Planned run entries and the matrix rows handed to backends.

use crate::entry::{Entry, EntryKind};
use crate::ids::{AppId, EntryId};
use crate::runner::RunnerOs;
use crate::trigger::ClassifiedTrigger;
use schemars::JsonSchema;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolved per-application state for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AppRunEntry {
    pub app_id: AppId,
    pub environment: String,
    pub version: Version,
    pub has_release: bool,
}

/// One entry planned on one runner target.
#[derive(Debug, Clone)]
pub struct RunEntry {
    pub entry: Arc<Entry>,
    pub app_id: Option<AppId>,
    pub version: Option<AppRunEntry>,
    pub runner_target: RunnerOs,
    /// Position in the order the planner produced entries.
    pub index: usize,
    pub concurrency_group_key: Option<String>,
    pub rank: Option<usize>,
}

impl RunEntry {
    pub fn kind(&self) -> EntryKind {
        self.entry.kind
    }

    /// Key identifying this (entry, target) pair across the whole plan.
    pub fn unique_key(&self) -> String {
        format!(
            "entry:{}:{}:{}",
            self.entry.kind, self.entry.id, self.runner_target
        )
    }
}

/// Backend-neutral record for one (entry, runner target) job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixRow {
    pub entry_id: EntryId,
    pub entry_name: String,
    pub kind: EntryKind,
    pub app_id: Option<AppId>,
    pub environment: Option<String>,
    pub version: Option<String>,
    pub has_release: bool,
    pub runner_os: RunnerOs,
    pub runner_name: String,
    pub cache_invalidator: String,
    pub cache_paths: Vec<String>,
    pub concurrency_group: String,
    pub rank: usize,
}

/// Complete output of one orchestration pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    pub trigger: ClassifiedTrigger,
    pub rows: Vec<MatrixRow>,
    pub apps: BTreeMap<AppId, AppRunEntry>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows_for(&self, entry_id: &str) -> impl Iterator<Item = &MatrixRow> {
        self.rows
            .iter()
            .filter(move |row| row.entry_id.as_str() == entry_id)
    }
}
