//! Command handlers.

use crate::commands::PlanArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::declarations::{Declarations, TEMPLATE};
use anyhow::Context;
use console::style;
use railyard_core::EntryId;
use railyard_core::entry::EntryKind;
use railyard_core::run::{MatrixRow, Plan};
use railyard_core::trigger::RawEvent;
use railyard_scheduler::{Orchestrator, parse_commit_directives};
use std::path::Path;
use tracing::debug;

/// Write a starter declaration file.
pub async fn init(path: &str) -> anyhow::Result<()> {
    if Path::new(path).exists() {
        println!("{} {} already exists", style("!").yellow(), path);
        return Ok(());
    }

    tokio::fs::write(path, TEMPLATE)
        .await
        .with_context(|| format!("writing {}", path))?;
    println!("{} Created {}", style("✓").green(), path);
    Ok(())
}

/// Load and parse a declaration file.
pub async fn load_declarations(path: &str) -> anyhow::Result<Declarations> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path))?;
    let declarations =
        Declarations::from_yaml(&content).with_context(|| format!("parsing {}", path))?;
    debug!(path, entries = declarations.entries.len(), "Loaded declarations");
    Ok(declarations)
}

/// Validate a declaration file.
pub async fn validate(config: &CliConfig, path: Option<String>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| config.declarations.clone());
    let declarations = load_declarations(&path).await?;
    let graph = declarations
        .build_graph()
        .with_context(|| format!("building entries from {}", path))?;

    println!("{} {} is valid", style("✓").green(), path);
    println!("  Strategy: {:?}", declarations.strategy);
    for kind in [EntryKind::Test, EntryKind::Build, EntryKind::Publish] {
        let entries: Vec<_> = graph.entries_of(kind).collect();
        println!("  {}: {}", kind, entries.len());
        for entry in entries {
            println!(
                "    - {} ({}) on {}",
                entry.id,
                entry.name,
                entry
                    .runner_targets
                    .iter()
                    .map(|os| os.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    println!("  Applications with history: {}", declarations.releases.len());
    Ok(())
}

/// Build the raw trigger event from command-line flags.
pub fn raw_event(args: &PlanArgs) -> anyhow::Result<RawEvent> {
    let mut bump_requests = args.bumps.clone();
    if let Some(message) = &args.message {
        bump_requests.extend(parse_commit_directives(message)?);
    }

    Ok(RawEvent {
        local: args.local,
        branch: args.branch.clone(),
        pr_number: args.pr,
        commit_range: args.commit_range.clone(),
        bump: !bump_requests.is_empty(),
        bump_requests,
        targets: args.targets.iter().map(|t| EntryId::new(t.as_str())).collect(),
    })
}

/// Compute the plan for the requested trigger.
pub async fn compute_plan(config: &CliConfig, args: &PlanArgs) -> anyhow::Result<Plan> {
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| config.declarations.clone());
    let declarations = load_declarations(&path).await?;
    let graph = declarations.build_graph()?;
    let history = declarations.release_history();
    let backend = args.backend.unwrap_or(config.backend);
    let environment = args
        .environment
        .clone()
        .unwrap_or_else(|| config.default_environment.clone());

    let event = raw_event(args)?;
    let plan = Orchestrator::new(declarations.strategy)
        .with_environment(environment)
        .run(&event, &graph, &history, &backend)?;
    Ok(plan)
}

/// Print the plan for a trigger event.
pub async fn plan(config: &CliConfig, args: PlanArgs) -> anyhow::Result<()> {
    let plan = compute_plan(config, &args).await?;

    match args.format.unwrap_or(config.output_format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&plan)?),
        OutputFormat::Table => print_table(&plan),
    }
    Ok(())
}

fn print_table(plan: &Plan) {
    println!(
        "{} {} run on {}",
        style("▶").cyan(),
        style(plan.trigger.kind).bold(),
        style(plan.trigger.branch.as_deref().unwrap_or("(local)")).dim()
    );

    for app in plan.apps.values() {
        println!(
            "  {} {} ({}, {})",
            app.app_id,
            style(&app.version).bold(),
            app.environment,
            if app.has_release { "released" } else { "unreleased" }
        );
    }

    if plan.is_empty() {
        println!("{} Nothing to run", style("i").blue());
        return;
    }

    print!("{}", render_rows(&plan.rows));
}

/// Render rows as aligned columns.
pub fn render_rows(rows: &[MatrixRow]) -> String {
    let header = ["RANK", "KIND", "ENTRY", "APP", "VERSION", "RUNNER", "GROUP"];
    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|row| {
            [
                row.rank.to_string(),
                row.kind.to_string(),
                row.entry_id.to_string(),
                row.app_id.as_ref().map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
                row.version.clone().unwrap_or_else(|| "-".to_string()),
                row.runner_name.clone(),
                row.concurrency_group.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut push_line = |cols: Vec<&str>| {
        let line: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:<width$}", col, width = width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_line(header.to_vec());
    for row in &cells {
        push_line(row.iter().map(String::as_str).collect());
    }
    out
}

/// Print the JSON schema of the declaration file.
pub fn schema() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(Declarations);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Show configuration.
pub fn show_config(config: &CliConfig) -> anyhow::Result<()> {
    println!("Current configuration:");
    println!("  output_format: {:?}", config.output_format);
    println!("  backend: {}", config.backend.as_str());
    println!("  default_environment: {}", config.default_environment);
    println!("  declarations: {}", config.declarations);

    if let Ok(path) = CliConfig::config_path() {
        println!("\nConfig file: {}", path.display());
    }

    Ok(())
}

/// Set configuration.
pub fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = CliConfig::load().unwrap_or_default();
    config.set(key, value)?;
    config.save()?;

    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}
