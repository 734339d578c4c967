//! Declared units of work: tests, builds, and publishes.

use crate::ids::{AppId, EntryId};
use crate::pattern;
use crate::runner::RunnerOs;
use crate::trigger::{TriggerFlags, TriggerKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Test,
    Build,
    Publish,
}

impl EntryKind {
    /// Execution priority; tests gate builds, builds gate publishes.
    pub fn priority(&self) -> u8 {
        match self {
            EntryKind::Test => 0,
            EntryKind::Build => 1,
            EntryKind::Publish => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Test => "test",
            EntryKind::Build => "build",
            EntryKind::Publish => "publish",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a condition may look at when it is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct ConditionContext<'a> {
    pub trigger: TriggerKind,
    pub branch: Option<&'a str>,
}

type Predicate = dyn Fn(&ConditionContext<'_>) -> bool + Send + Sync;

/// Opaque predicate deciding whether an entry runs at all.
#[derive(Clone)]
pub struct Condition(Arc<Predicate>);

impl Condition {
    pub fn always() -> Self {
        Self::constant(true)
    }

    pub fn never() -> Self {
        Self::constant(false)
    }

    pub fn constant(value: bool) -> Self {
        Self::from_fn(move |_| value)
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&ConditionContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// True when the run's branch matches any pattern. Runs without a branch
    /// (local invocations) always pass.
    pub fn on_branches(patterns: Vec<String>) -> Self {
        Self::from_fn(move |ctx| match ctx.branch {
            Some(branch) => pattern::any_match(&patterns, branch),
            None => true,
        })
    }

    pub fn and(self, other: Condition) -> Self {
        Self::from_fn(move |ctx| self.evaluate(ctx) && other.evaluate(ctx))
    }

    pub fn evaluate(&self, ctx: &ConditionContext<'_>) -> bool {
        (self.0)(ctx)
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheSpec {
    /// Runs with an equal invalidator may reuse cached outputs.
    #[serde(default)]
    pub invalidator: String,
    #[serde(default)]
    pub paths: Vec<String>,
}

/// A declared test, build, or publish unit.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub kind: EntryKind,
    /// Application this entry belongs to; global entries have none.
    pub app_id: Option<AppId>,
    pub accepted_triggers: TriggerFlags,
    pub condition: Condition,
    pub runner_targets: Vec<RunnerOs>,
    pub cache: CacheSpec,
}

impl Entry {
    pub fn new(kind: EntryKind, id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            app_id: None,
            accepted_triggers: TriggerFlags::empty(),
            condition: Condition::always(),
            runner_targets: Vec::new(),
            cache: CacheSpec::default(),
        }
    }

    pub fn test(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self::new(EntryKind::Test, id, name)
    }

    pub fn build(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self::new(EntryKind::Build, id, name)
    }

    pub fn publish(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self::new(EntryKind::Publish, id, name)
    }

    pub fn with_app(mut self, app_id: impl Into<AppId>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn accepts(mut self, triggers: TriggerFlags) -> Self {
        self.accepted_triggers |= triggers;
        self
    }

    pub fn runs_on(mut self, targets: impl IntoIterator<Item = RunnerOs>) -> Self {
        self.runner_targets.extend(targets);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_cache(mut self, invalidator: impl Into<String>, paths: Vec<String>) -> Self {
        self.cache = CacheSpec {
            invalidator: invalidator.into(),
            paths,
        };
        self
    }
}
