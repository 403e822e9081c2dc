//! Hive Runtime
//!
//! Minimal binary that loads a drone scenario and ticks it

use anyhow::{Context, Result};
use clap::Parser;
use hive_drones::{build_simulation, ScenarioSettings, State};
use hive_metrics::TickTimer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the runtime
#[derive(Parser, Debug)]
#[command(name = "hive")]
#[command(about = "Run a drone scenario on the hive engine")]
struct Args {
    /// Scenario file (JSON); the built-in scenario when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run, overriding the scenario
    #[arg(long)]
    ticks: Option<u64>,

    /// Random seed, overriding the scenario
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final component bags as JSON
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Hive Engine v{}", hive_core::VERSION);

    let mut settings = match &args.config {
        Some(path) => ScenarioSettings::load(path)
            .with_context(|| format!("loading scenario from {}", path.display()))?,
        None => ScenarioSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    let ticks = args.ticks.unwrap_or(settings.ticks);

    let mut sim = build_simulation(&settings).context("building simulation")?;
    for (handle, system) in sim.systems() {
        tracing::info!(
            %handle,
            system = system.name(),
            behaviors = system.behaviors().len(),
            components = ?system.all_components().names::<State>(),
            "system registered"
        );
    }

    let mut timer = TickTimer::new(120);
    for _ in 0..ticks {
        timer.begin();
        let report = sim.tick();
        timer.end(report.total_invocations());
        tracing::debug!(
            tick = report.tick,
            invocations = report.total_invocations(),
            "tick"
        );
    }

    let (fastest, slowest) = timer.tick_range();
    tracing::info!(
        ticks = sim.tick_count(),
        entities = sim.entities().len(),
        mean_tick = ?timer.mean_tick(),
        ?fastest,
        ?slowest,
        invocations_per_tick = timer.mean_invocations(),
        per_invocation = ?timer.cost_per_invocation(),
        "run complete"
    );
    for (name, total) in sim.profiler().iter() {
        tracing::info!(
            behavior = name,
            total_ms = total.as_secs_f64() * 1000.0,
            invocations = sim.counter().get(name),
            "behavior cost"
        );
    }

    if args.dump {
        let bags: Vec<_> = sim
            .entities()
            .snapshot()
            .into_iter()
            .map(|(id, state)| serde_json::json!({ "id": id, "state": state }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&bags).context("serializing final state")?
        );
    }

    Ok(())
}
