use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dispatch_core::dispatcher::Dispatcher;
use dispatch_core::ecs::{RideId, RideStatus};
use dispatch_core::scenario::{build_scenario, DispatchConfig, ScenarioParams};
use dispatch_core::telemetry::{SimTelemetry, StateSnapshot};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "dispatch",
    about = "Ride dispatch simulation on a 2-D grid",
    long_about = "Seeds a grid with drivers and riders, dispatches every ride request\n\
                  and ticks the simulation, printing trip events as JSON lines."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a seeded scenario and stream events to stdout
    Run(RunArgs),
    /// Print the default dispatch configuration as JSON
    Config,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Number of drivers to place
    #[arg(long, default_value_t = 10)]
    drivers: usize,
    /// Number of riders, each requesting one ride
    #[arg(long, default_value_t = 20)]
    riders: usize,
    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = 500)]
    ticks: u64,
    /// RNG seed for driver and rider placement
    #[arg(long, default_value_t = 0, env = "DISPATCH_SEED")]
    seed: u64,
    /// JSON file with dispatch configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,
    /// Re-run assignment for waiting rides after every tick
    #[arg(long)]
    retry_waiting: bool,
    /// Print the final state snapshot instead of the telemetry summary
    #[arg(long)]
    snapshot: bool,
}

// ── Output ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Summary<'a> {
    ticks: u64,
    waiting: usize,
    failed: usize,
    telemetry: &'a SimTelemetry,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Report<'a> {
    Summary(Summary<'a>),
    Snapshot(StateSnapshot),
}

// ── Commands ───────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<DispatchConfig> {
    let Some(path) = path else {
        return Ok(DispatchConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("invalid dispatch config in {}", path.display()))?;
    Ok(config)
}

fn waiting_rides(dispatcher: &Dispatcher) -> Vec<RideId> {
    dispatcher
        .rides()
        .filter(|ride| ride.status == RideStatus::Waiting)
        .map(|ride| ride.id.clone())
        .collect()
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut dispatcher = Dispatcher::new(config);
    let params = ScenarioParams::default()
        .with_seed(args.seed)
        .with_drivers(args.drivers)
        .with_riders(args.riders);
    build_scenario(&mut dispatcher, params).context("failed to build scenario")?;
    info!(
        drivers = args.drivers,
        riders = args.riders,
        seed = args.seed,
        "scenario ready"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..args.ticks {
        for event in dispatcher.tick() {
            serde_json::to_writer(&mut out, &event)?;
            writeln!(out)?;
        }
        if args.retry_waiting {
            for ride in waiting_rides(&dispatcher) {
                dispatcher.assign_ride(&ride)?;
            }
        }
        if dispatcher.snapshot().active_trips.is_empty()
            && (!args.retry_waiting || waiting_rides(&dispatcher).is_empty())
        {
            break;
        }
    }

    let snapshot = dispatcher.snapshot();
    let waiting = waiting_rides(&dispatcher).len();
    if !snapshot.active_trips.is_empty() {
        warn!(active = snapshot.active_trips.len(), "tick limit reached with trips in progress");
    }
    let report = if args.snapshot {
        Report::Snapshot(snapshot)
    } else {
        Report::Summary(Summary {
            ticks: dispatcher.now(),
            waiting,
            failed: dispatcher
                .rides()
                .filter(|ride| ride.status == RideStatus::Failed)
                .count(),
            telemetry: dispatcher.telemetry(),
        })
    };
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    out.flush()?;
    info!(ticks = dispatcher.now(), waiting, "run finished");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&DispatchConfig::default())?);
            Ok(())
        }
    }
}
