//! Single forward pass from a raw trigger event to matrix rows.

use crate::concurrency::ConcurrencyGrouper;
use crate::graph::EntryGraph;
use crate::matrix::MatrixEmitter;
use crate::planner::{DEFAULT_ENVIRONMENT, RunPlanner};
use crate::triggers::TriggerClassifier;
use railyard_core::Result;
use railyard_core::ports::ReleaseHistory;
use railyard_core::run::Plan;
use railyard_core::runner::RunnerNameResolver;
use railyard_core::trigger::{RawEvent, WorkflowStrategy};
use tracing::{info, info_span};

/// Classifies, plans, groups, and emits in one pass.
pub struct Orchestrator {
    classifier: TriggerClassifier,
    planner: RunPlanner,
    grouper: ConcurrencyGrouper,
}

impl Orchestrator {
    pub fn new(strategy: WorkflowStrategy) -> Self {
        Self {
            classifier: TriggerClassifier::new(),
            planner: RunPlanner::new(DEFAULT_ENVIRONMENT),
            grouper: ConcurrencyGrouper::new(strategy),
        }
    }

    /// Environment recorded on every resolved application.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.planner = RunPlanner::new(environment);
        self
    }

    /// Run the whole pipeline for one event. Either a complete plan is
    /// returned or an error; nothing is emitted on failure.
    pub fn run(
        &self,
        event: &RawEvent,
        graph: &EntryGraph,
        history: &dyn ReleaseHistory,
        resolver: &dyn RunnerNameResolver,
    ) -> Result<Plan> {
        let span = info_span!("orchestrate", environment = self.planner.environment());
        let _guard = span.enter();

        let trigger = self.classifier.classify(event)?;
        let planned = self.planner.plan(&trigger, graph, history)?;
        let grouped = self.grouper.group(planned.entries);
        let rows = MatrixEmitter::new(resolver).emit(&grouped);

        info!(trigger = %trigger.kind, rows = rows.len(), "Emitted matrix");

        Ok(Plan {
            trigger,
            rows,
            apps: planned.apps,
        })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(WorkflowStrategy::empty())
    }
}
