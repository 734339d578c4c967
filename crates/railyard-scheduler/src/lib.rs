//! Run planning and orchestration for Railyard.
//!
//! Turns a declared set of entries and one trigger event into an ordered,
//! grouped list of matrix rows:
//! raw event → classified trigger → selected entries (with versions) →
//! grouped entries → matrix rows.

pub mod concurrency;
pub mod graph;
pub mod matrix;
pub mod orchestrator;
pub mod planner;
pub mod triggers;
pub mod version;

pub use concurrency::ConcurrencyGrouper;
pub use graph::EntryGraph;
pub use matrix::MatrixEmitter;
pub use orchestrator::Orchestrator;
pub use planner::{PlannedRun, RunPlanner, unmatched_targets};
pub use triggers::{TriggerClassifier, parse_commit_directives};
pub use version::VersionBumpEngine;
