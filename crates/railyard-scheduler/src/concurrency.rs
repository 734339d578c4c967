//! Concurrency group keys and execution ranks.

use railyard_core::run::RunEntry;
use railyard_core::trigger::WorkflowStrategy;
use tracing::debug;

/// Assigns concurrency group keys and ranks according to a strategy.
///
/// Entries sharing a group key must be serialized by the executor, in rank
/// order. Ranks follow entry kind priority (tests, then builds, then
/// publishes) and then the order the planner produced entries in.
pub struct ConcurrencyGrouper {
    strategy: WorkflowStrategy,
}

impl ConcurrencyGrouper {
    pub fn new(strategy: WorkflowStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> WorkflowStrategy {
        self.strategy
    }

    /// Fill in group keys and ranks, reordering entries by rank.
    pub fn group(&self, mut entries: Vec<RunEntry>) -> Vec<RunEntry> {
        entries.sort_by_key(|e| (e.kind().priority(), e.index));

        for (rank, entry) in entries.iter_mut().enumerate() {
            let key = self.group_key(entry);
            debug!(entry = %entry.entry.id, os = %entry.runner_target, group = %key, rank, "Grouped");
            entry.concurrency_group_key = Some(key);
            entry.rank = Some(rank);
        }

        entries
    }

    fn group_key(&self, entry: &RunEntry) -> String {
        let by_app = self.strategy.contains(WorkflowStrategy::SYNCHRONOUS_APP_ID);
        let by_kind = self
            .strategy
            .contains(WorkflowStrategy::SYNCHRONOUS_ENTRY_TYPE);

        match (by_app, by_kind, entry.app_id.as_ref()) {
            (true, true, Some(app)) => format!("app:{}:kind:{}", app, entry.kind()),
            (true, true, None) | (false, true, _) => format!("kind:{}", entry.kind()),
            (true, false, Some(app)) => format!("app:{}", app),
            _ => entry.unique_key(),
        }
    }
}
