//! Run planning: entry selection, version resolution, and target expansion.

use crate::graph::EntryGraph;
use crate::version::VersionBumpEngine;
use railyard_core::entry::{ConditionContext, Entry};
use railyard_core::ports::ReleaseHistory;
use railyard_core::run::{AppRunEntry, RunEntry};
use railyard_core::trigger::{ClassifiedTrigger, TriggerFlags, TriggerKind};
use railyard_core::version::{BumpRequest, ReleaseRecord};
use railyard_core::{AppId, EntryId, Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Entries selected for a run plus the per-application state they observe.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub entries: Vec<RunEntry>,
    pub apps: BTreeMap<AppId, AppRunEntry>,
}

/// Selects the entries a trigger runs and resolves application versions.
pub struct RunPlanner {
    engine: VersionBumpEngine,
    environment: String,
}

impl RunPlanner {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            engine: VersionBumpEngine::new(),
            environment: environment.into(),
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Plan a run. Fails without a partial plan when any bumped application
    /// is unknown or any bump request is malformed.
    pub fn plan(
        &self,
        trigger: &ClassifiedTrigger,
        graph: &EntryGraph,
        history: &dyn ReleaseHistory,
    ) -> Result<PlannedRun> {
        let mut apps = if trigger.kind == TriggerKind::Bump {
            self.resolve_bumps(trigger, history)?
        } else {
            BTreeMap::new()
        };

        for target in unmatched_targets(trigger, graph) {
            warn!(target = %target, "Explicit target matches no declared entry");
        }

        let ctx = ConditionContext {
            trigger: trigger.kind,
            branch: trigger.branch.as_deref(),
        };
        let selected: Vec<&Arc<Entry>> = graph
            .iter()
            .filter(|entry| self.accepts(trigger, entry))
            .filter(|entry| {
                let pass = entry.condition.evaluate(&ctx);
                if !pass {
                    debug!(entry = %entry.id, kind = %entry.kind, "Condition false, skipping");
                }
                pass
            })
            .collect();

        for app_id in selected.iter().filter_map(|e| e.app_id.as_ref()) {
            if !apps.contains_key(app_id) {
                let resolved = self.resolve_current(trigger.kind, app_id, history);
                apps.insert(app_id.clone(), resolved);
            }
        }

        let mut entries = Vec::new();
        for entry in selected {
            let version = entry.app_id.as_ref().and_then(|id| apps.get(id)).cloned();
            for &target in &entry.runner_targets {
                entries.push(RunEntry {
                    entry: Arc::clone(entry),
                    app_id: entry.app_id.clone(),
                    version: version.clone(),
                    runner_target: target,
                    index: entries.len(),
                    concurrency_group_key: None,
                    rank: None,
                });
            }
        }

        info!(
            trigger = %trigger.kind,
            declared = graph.len(),
            planned = entries.len(),
            apps = apps.len(),
            "Planned run"
        );

        Ok(PlannedRun { entries, apps })
    }

    fn accepts(&self, trigger: &ClassifiedTrigger, entry: &Entry) -> bool {
        let by_kind = entry.accepted_triggers.intersects(trigger.kind.flag());
        let by_target = trigger.is_targeted(&entry.id)
            && entry.accepted_triggers.contains(TriggerFlags::TARGET);
        if !(by_kind || by_target) {
            debug!(entry = %entry.id, kind = %entry.kind, trigger = %trigger.kind, "Trigger not accepted, skipping");
        }
        by_kind || by_target
    }

    fn resolve_bumps(
        &self,
        trigger: &ClassifiedTrigger,
        history: &dyn ReleaseHistory,
    ) -> Result<BTreeMap<AppId, AppRunEntry>> {
        let mut by_app: BTreeMap<&AppId, Vec<BumpRequest>> = BTreeMap::new();
        for request in &trigger.bump_requests {
            by_app
                .entry(&request.app_id)
                .or_default()
                .push(request.clone());
        }

        let mut apps = BTreeMap::new();
        for (app_id, requests) in by_app {
            let record = history
                .lookup(app_id)
                .ok_or_else(|| Error::UnknownApplication {
                    app_id: app_id.to_string(),
                    trigger: trigger.kind,
                })?;
            let current = record.current_version();
            let version = self.engine.bump_all(&current, &requests)?;
            info!(app = %app_id, from = %current, to = %version, "Resolved bump");

            apps.insert(
                app_id.clone(),
                AppRunEntry {
                    app_id: app_id.clone(),
                    environment: self.environment.clone(),
                    version,
                    has_release: record.has_release,
                },
            );
        }
        Ok(apps)
    }

    fn resolve_current(
        &self,
        kind: TriggerKind,
        app_id: &AppId,
        history: &dyn ReleaseHistory,
    ) -> AppRunEntry {
        let record = history.lookup(app_id).unwrap_or_else(|| {
            warn!(app = %app_id, trigger = %kind, "No release history, planning from 0.0.0");
            ReleaseRecord::unreleased()
        });
        AppRunEntry {
            app_id: app_id.clone(),
            environment: self.environment.clone(),
            version: record.current_version(),
            has_release: record.has_release,
        }
    }
}

/// Explicit targets that name no declared entry of any kind.
pub fn unmatched_targets<'a>(
    trigger: &'a ClassifiedTrigger,
    graph: &EntryGraph,
) -> Vec<&'a EntryId> {
    trigger
        .explicit_targets
        .iter()
        .filter(|id| !graph.iter().any(|entry| &entry.id == *id))
        .collect()
}

impl Default for RunPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_ENVIRONMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triggers::TriggerClassifier;
    use railyard_core::entry::Condition;
    use railyard_core::ports::StaticReleaseHistory;
    use railyard_core::runner::RunnerOs;
    use railyard_core::trigger::RawEvent;
    use railyard_core::version::VersionPart;
    use semver::Version;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn classify(event: RawEvent) -> ClassifiedTrigger {
        TriggerClassifier::new().classify(&event).unwrap()
    }

    fn sample_graph() -> EntryGraph {
        EntryGraph::try_from(vec![
            Entry::test("t1", "Unit tests")
                .accepts(TriggerFlags::COMMIT | TriggerFlags::PULL_REQUEST)
                .runs_on([RunnerOs::UbuntuLatest, RunnerOs::Windows2022]),
            Entry::build("b1", "Build core")
                .with_app("core")
                .accepts(TriggerFlags::COMMIT)
                .runs_on([RunnerOs::UbuntuLatest]),
            Entry::publish("p1", "Publish core")
                .with_app("core")
                .accepts(TriggerFlags::BUMP | TriggerFlags::TARGET)
                .runs_on([RunnerOs::UbuntuLatest]),
        ])
        .unwrap()
    }

    fn history() -> StaticReleaseHistory {
        StaticReleaseHistory::new().with_release("core", Version::new(1, 4, 9))
    }

    fn ids(planned: &PlannedRun) -> Vec<String> {
        planned
            .entries
            .iter()
            .map(|e| format!("{}@{}", e.entry.id, e.runner_target))
            .collect()
    }

    #[test]
    fn test_commit_selects_matching_entries() {
        let planned = RunPlanner::default()
            .plan(&classify(RawEvent::commit("main")), &sample_graph(), &history())
            .unwrap();
        assert_eq!(
            ids(&planned),
            vec!["t1@ubuntu-latest", "t1@windows-2022", "b1@ubuntu-latest"]
        );
        assert_eq!(planned.entries[2].index, 2);
    }

    #[test]
    fn test_non_bump_uses_released_version() {
        let planned = RunPlanner::new("staging")
            .plan(&classify(RawEvent::commit("main")), &sample_graph(), &history())
            .unwrap();
        let core = &planned.apps[&AppId::new("core")];
        assert_eq!(core.version, Version::new(1, 4, 9));
        assert!(core.has_release);
        assert_eq!(core.environment, "staging");

        let build = &planned.entries[2];
        assert_eq!(build.version.as_ref(), Some(core));
        assert!(planned.entries[0].version.is_none());
    }

    #[test]
    fn test_explicit_target_requires_target_flag() {
        let event = RawEvent::local().with_targets(["p1", "b1"]);
        let planned = RunPlanner::default()
            .plan(&classify(event), &sample_graph(), &history())
            .unwrap();
        // b1 is named but does not accept targeting; p1 does.
        assert_eq!(ids(&planned), vec!["p1@ubuntu-latest"]);
    }

    #[test]
    fn test_unmatched_targets_reported() {
        let trigger = classify(RawEvent::local().with_targets(["p1", "p2"]));
        let graph = sample_graph();
        assert_eq!(unmatched_targets(&trigger, &graph), vec![&EntryId::new("p2")]);

        let planned = RunPlanner::default().plan(&trigger, &graph, &history()).unwrap();
        assert_eq!(ids(&planned), vec!["p1@ubuntu-latest"]);
    }

    #[test]
    fn test_false_condition_drops_entry() {
        let graph = EntryGraph::try_from(vec![
            Entry::test("t1", "t1")
                .accepts(TriggerFlags::COMMIT)
                .runs_on([RunnerOs::UbuntuLatest])
                .with_condition(Condition::on_branches(vec!["main".to_string()])),
        ])
        .unwrap();
        let planned = RunPlanner::default()
            .plan(&classify(RawEvent::commit("develop")), &graph, &history())
            .unwrap();
        assert!(planned.entries.is_empty());
    }

    #[test]
    fn test_condition_evaluated_once_per_entry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let graph = EntryGraph::try_from(vec![
            Entry::test("t1", "t1")
                .accepts(TriggerFlags::COMMIT)
                .runs_on([RunnerOs::UbuntuLatest, RunnerOs::MacosLatest])
                .with_condition(Condition::from_fn(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    true
                })),
        ])
        .unwrap();
        let planned = RunPlanner::default()
            .plan(&classify(RawEvent::commit("main")), &graph, &history())
            .unwrap();
        assert_eq!(planned.entries.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bump_resolves_next_version() {
        let event = RawEvent::bump(
            "main",
            vec![BumpRequest::increment("core", VersionPart::Minor)],
        );
        let planned = RunPlanner::default()
            .plan(&classify(event), &sample_graph(), &history())
            .unwrap();
        let core = &planned.apps[&AppId::new("core")];
        assert_eq!(core.version, Version::new(1, 5, 0));
        assert!(core.has_release);
        assert_eq!(ids(&planned), vec!["p1@ubuntu-latest"]);
        assert_eq!(planned.entries[0].version.as_ref().map(|a| &a.version), Some(&core.version));
    }

    #[test]
    fn test_bump_unknown_application_fails() {
        let event = RawEvent::bump(
            "main",
            vec![BumpRequest::increment("ghost", VersionPart::Patch)],
        );
        let err = RunPlanner::default()
            .plan(&classify(event), &sample_graph(), &history())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownApplication { ref app_id, trigger: TriggerKind::Bump } if app_id == "ghost"
        ));
    }

    #[test]
    fn test_unknown_application_on_commit_starts_from_zero() {
        let planned = RunPlanner::default()
            .plan(
                &classify(RawEvent::commit("main")),
                &sample_graph(),
                &StaticReleaseHistory::new(),
            )
            .unwrap();
        let core = &planned.apps[&AppId::new("core")];
        assert_eq!(core.version, Version::new(0, 0, 0));
        assert!(!core.has_release);
    }
}
