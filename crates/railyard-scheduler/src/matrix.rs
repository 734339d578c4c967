//! Matrix row emission for CI backends and the local runner.

use railyard_core::run::{MatrixRow, RunEntry};
use railyard_core::runner::RunnerNameResolver;

/// Flattens grouped run entries into backend-neutral matrix rows.
pub struct MatrixEmitter<'a> {
    resolver: &'a dyn RunnerNameResolver,
}

impl<'a> MatrixEmitter<'a> {
    pub fn new(resolver: &'a dyn RunnerNameResolver) -> Self {
        Self { resolver }
    }

    /// Emit one row per run entry, in rank order.
    ///
    /// Entries must have been grouped first.
    pub fn emit(&self, entries: &[RunEntry]) -> Vec<MatrixRow> {
        let mut rows: Vec<MatrixRow> = entries.iter().map(|e| self.row(e)).collect();
        rows.sort_by_key(|row| row.rank);
        rows
    }

    fn row(&self, entry: &RunEntry) -> MatrixRow {
        debug_assert!(
            entry.concurrency_group_key.is_some() && entry.rank.is_some(),
            "run entry {} emitted before grouping",
            entry.entry.id
        );

        let app = entry.version.as_ref();
        MatrixRow {
            entry_id: entry.entry.id.clone(),
            entry_name: entry.entry.name.clone(),
            kind: entry.kind(),
            app_id: entry.app_id.clone(),
            environment: app.map(|a| a.environment.clone()),
            version: app.map(|a| a.version.to_string()),
            has_release: app.is_some_and(|a| a.has_release),
            runner_os: entry.runner_target,
            runner_name: self.resolver.runner_name(entry.runner_target),
            cache_invalidator: entry.entry.cache.invalidator.clone(),
            cache_paths: entry.entry.cache.paths.clone(),
            concurrency_group: entry
                .concurrency_group_key
                .clone()
                .unwrap_or_else(|| entry.unique_key()),
            rank: entry.rank.unwrap_or(entry.index),
        }
    }
}
