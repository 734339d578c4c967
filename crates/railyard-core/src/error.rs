//! Error types for Railyard.

use crate::entry::EntryKind;
use crate::trigger::TriggerKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Trigger errors
    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),

    // Version errors
    #[error("Invalid bump for application {app_id}: {reason}")]
    InvalidBump { app_id: String, reason: String },

    #[error("Unknown application {app_id} in {trigger} run: no release history")]
    UnknownApplication { app_id: String, trigger: TriggerKind },

    // Entry graph errors
    #[error("Duplicate {kind} entry: {id}")]
    DuplicateEntry { kind: EntryKind, id: String },

    #[error("Invalid {kind} entry {id}: {reason}")]
    InvalidEntry {
        kind: EntryKind,
        id: String,
        reason: String,
    },

    // Declaration errors
    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_bump(app_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidBump {
            app_id: app_id.into(),
            reason: reason.into(),
        }
    }
}
