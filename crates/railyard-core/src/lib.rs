//! Railyard Core
//!
//! Core domain types, traits, and error handling for Railyard.
//! This crate has minimal dependencies and defines the shared vocabulary
//! used by the planner and the command-line interface.

mod flags;

pub mod entry;
pub mod error;
pub mod ids;
pub mod pattern;
pub mod ports;
pub mod run;
pub mod runner;
pub mod trigger;
pub mod version;

pub use error::{Error, Result};
pub use ids::*;
