//! CLI command definitions.

use crate::config::OutputFormat;
use clap::{Args, Subcommand};
use railyard_core::runner::Backend;
use railyard_core::version::BumpRequest;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter declaration file
    Init {
        /// Path to declaration file
        #[arg(default_value = "railyard.yaml")]
        path: String,
    },

    /// Validate a declaration file
    Validate {
        /// Path to declaration file
        path: Option<String>,
    },

    /// Compute the execution plan for a trigger event
    Plan(PlanArgs),

    /// Print the JSON schema of the declaration file
    Schema,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Path to declaration file
    pub path: Option<String>,

    /// Local invocation
    #[arg(long)]
    pub local: bool,

    /// Entry to run explicitly (local invocations only)
    #[arg(short, long = "target", requires = "local")]
    pub targets: Vec<String>,

    /// Branch the event happened on
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Pull request number
    #[arg(long)]
    pub pr: Option<u64>,

    /// Git revision range the event covers
    #[arg(long, conflicts_with = "local")]
    pub commit_range: Option<String>,

    /// Bump directive, e.g. core:minor or web:prerelease=rc.1@2
    #[arg(long = "bump")]
    pub bumps: Vec<BumpRequest>,

    /// Commit message to scan for [bump ...] directives
    #[arg(short, long)]
    pub message: Option<String>,

    /// Environment recorded on resolved applications
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Backend whose runner names are emitted
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Key
        key: String,

        /// Value
        value: String,
    },
}
