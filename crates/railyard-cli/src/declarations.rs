//! Declaration file: entries, release history, and workflow strategy.

use railyard_core::entry::{CacheSpec, Condition, Entry, EntryKind};
use railyard_core::ports::StaticReleaseHistory;
use railyard_core::runner::RunnerOs;
use railyard_core::trigger::{TriggerFlags, WorkflowStrategy};
use railyard_core::version::ReleaseRecord;
use railyard_core::{AppId, EntryId, Error, Result};
use railyard_scheduler::EntryGraph;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Declarations {
    #[serde(default)]
    pub strategy: WorkflowStrategy,
    pub entries: Vec<EntryDeclaration>,
    /// Release history per application.
    #[serde(default)]
    pub releases: BTreeMap<AppId, ReleaseRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EntryDeclaration {
    pub id: EntryId,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: EntryKind,
    #[serde(default)]
    pub app: Option<AppId>,
    pub triggers: TriggerFlags,
    pub runners: Vec<RunnerOs>,
    /// Branch patterns the entry is limited to; empty means every branch.
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub cache: CacheSpec,
}

fn default_true() -> bool {
    true
}

impl EntryDeclaration {
    pub fn to_entry(&self) -> Entry {
        let mut condition = Condition::constant(self.enabled);
        if !self.branches.is_empty() {
            condition = condition.and(Condition::on_branches(self.branches.clone()));
        }

        let mut entry = Entry::new(
            self.kind,
            self.id.clone(),
            self.name.clone().unwrap_or_else(|| self.id.to_string()),
        )
        .accepts(self.triggers)
        .runs_on(self.runners.iter().copied())
        .with_condition(condition);
        entry.app_id = self.app.clone();
        entry.cache = self.cache.clone();
        entry
    }
}

impl Declarations {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::InvalidDeclaration(e.to_string()))
    }

    pub fn build_graph(&self) -> Result<EntryGraph> {
        let mut graph = EntryGraph::new();
        for declaration in &self.entries {
            graph.register(declaration.to_entry())?;
        }
        Ok(graph)
    }

    pub fn release_history(&self) -> StaticReleaseHistory {
        self.releases
            .iter()
            .map(|(app, record)| (app.clone(), record.clone()))
            .collect()
    }
}

pub const TEMPLATE: &str = r#"# Railyard entry declarations
strategy: [synchronous_app_id]

entries:
  - id: unit
    name: Unit tests
    kind: test
    triggers: [local, commit, pull_request]
    runners: [ubuntu-latest, windows-2022]
    cache:
      invalidator: Cargo.lock
      paths: ["target/**"]

  - id: app-build
    name: Build app
    kind: build
    app: app
    triggers: [commit, bump]
    runners: [ubuntu-latest]
    branches: ["main", "release/**"]

  - id: app-publish
    name: Publish app
    kind: publish
    app: app
    triggers: [bump, target]
    runners: [ubuntu-latest]

releases:
  app:
    version: "0.1.0"
    has_release: true
"#;
