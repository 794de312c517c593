//! chanwatch: replay acquisition events through channel-metric tools.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chanwatch_cli::events;
use chanwatch_cli::registry::ToolRegistry;
use chanwatch_cli::settings::Settings;
use chanwatch_sdk::{MetricTool, StatusProvider};

#[derive(Parser, Debug)]
#[command(name = "chanwatch")]
#[command(about = "Replay acquisition events through channel-metric tools")]
struct Args {
    /// Path to the settings file (TOML or JSON)
    #[arg(short, long, default_value = "chanwatch.toml")]
    config: PathBuf,

    /// Path to the JSON event file to replay
    #[arg(short, long)]
    events: PathBuf,

    /// Skip the end-of-run summaries
    #[arg(long)]
    no_summary: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::load(&args.config)?;
    let ranges = settings.range_table();
    let status: Arc<dyn StatusProvider> = Arc::new(settings.status_table());

    let registry = ToolRegistry::with_builtins();
    let mut tools: Vec<(String, MetricTool)> = Vec::new();
    for tool in &settings.tools {
        let built = registry
            .build(&tool.kind, tool.config.clone(), &ranges, status.clone())
            .with_context(|| format!("failed to configure tool {}", tool.name))?;
        tools.push((tool.name.clone(), built));
    }
    if tools.is_empty() {
        bail!("no tools configured in {}", args.config.display());
    }

    let events = events::load_events(&args.events)?;
    info!(events = events.len(), tools = tools.len(), "replaying events");

    for record in &events {
        let id = record.id();
        let channels = record.channel_map();
        for (name, tool) in &tools {
            let report = tool.view_map(&id, &channels);
            println!(
                "{name}: {id}: {} plot(s), {} evaluation error(s), {} i/o error(s)",
                report.plots.len(),
                report.evaluation_errors,
                report.io_errors
            );
        }
    }

    if !args.no_summary {
        for (name, tool) in &tools {
            let report = tool.summarize();
            let counters = tool.counters();
            println!(
                "{name}: summary over {} event(s) in {} run(s): {} plot(s)",
                counters.event_count,
                counters.run_count,
                report.plots.len()
            );
        }
    }

    Ok(())
}
