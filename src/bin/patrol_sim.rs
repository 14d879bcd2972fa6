//! Headless Patrol Runner
//!
//! Drives one session through a fixed route without real time passing and
//! prints a summary. Battery ticks between commands are run directly on the
//! engine, so a seeded run is fully reproducible.

use clap::Parser;
use rescue_rover::command::{parse_input, ConsoleCommand};
use rescue_rover::core::config::SimulationConfig;
use rescue_rover::simulation::engine::{SimulationEngine, StatusSnapshot};
use rescue_rover::ui::{EventLog, LogEntry, StatusMonitor};
use rescue_rover::world::Survivor;
use serde::Serialize;
use std::path::PathBuf;

/// Headless Patrol Runner - scripted rover routes
#[derive(Parser, Debug)]
#[command(name = "patrol_sim")]
#[command(about = "Run a scripted rover patrol and report what it found")]
struct Args {
    /// Comma-separated console commands, e.g. "d,d,heading 45,stop,tick 10"
    #[arg(long, default_value = "a,a,a,a,a,a,s,s,s,s,s,s")]
    route: String,

    /// Battery ticks to run after every route step
    #[arg(long, default_value_t = 1)]
    ticks_between: u64,

    /// Simulation config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every route step as it runs
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatrolSummary {
    session_id: String,
    seed: u64,
    steps: usize,
    accepted_moves: usize,
    rejected_moves: usize,
    ticks: u64,
    final_status: StatusSnapshot,
    survivors: Vec<Survivor>,
    events: Vec<LogEntry>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rescue_rover=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path),
        None => Ok(SimulationConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Determine seed
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    let config = config.with_seed(seed);

    match run_patrol(&args, config) {
        Ok(summary) => output_summary(&summary, &args.format),
        Err(e) => {
            eprintln!("Patrol failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_patrol(
    args: &Args,
    config: SimulationConfig,
) -> rescue_rover::core::error::Result<PatrolSummary> {
    config.validate()?;
    let seed = config.seed.unwrap_or_default();
    let mut monitor = StatusMonitor::new(&config);
    let mut engine = SimulationEngine::new(config);
    let mut log = EventLog::new();

    let session_id = engine.start_session();
    monitor.session_started(&mut log);
    monitor.observe_status(&engine.status_snapshot()?, &mut log);

    let mut steps = 0;
    let mut accepted_moves = 0;
    let mut rejected_moves = 0;

    for token in args.route.split(',') {
        let command = parse_input(token);
        if command == ConsoleCommand::Empty {
            continue;
        }
        steps += 1;

        match command {
            ConsoleCommand::Move(movement) => {
                let result = engine.apply_command(movement)?;
                if result.is_success() {
                    accepted_moves += 1;
                } else {
                    rejected_moves += 1;
                }
                if args.verbose {
                    eprintln!("[step {}] {:?}: {}", steps, movement, result.message());
                }
                monitor.observe_command(movement, &result, &mut log);

                // Look around after every move
                let report = engine.get_sensor_data()?;
                monitor.observe_sensors(&report, &mut log);
            }
            ConsoleCommand::Stop => {
                let result = engine.stop_rover()?;
                monitor.observe_stop(&result, &mut log);
            }
            ConsoleCommand::Sensors => {
                let report = engine.get_sensor_data()?;
                monitor.observe_sensors(&report, &mut log);
            }
            ConsoleCommand::Status => {
                let status = engine.get_rover_status()?;
                monitor.observe_status(&status, &mut log);
            }
            ConsoleCommand::Tick(n) => {
                engine.advance(n)?;
            }
            other => {
                eprintln!("Skipping route step '{}': {:?}", token.trim(), other);
                continue;
            }
        }

        engine.advance(args.ticks_between)?;
        monitor.observe_status(&engine.status_snapshot()?, &mut log);
    }

    let summary = PatrolSummary {
        session_id: session_id.to_string(),
        seed,
        steps,
        accepted_moves,
        rejected_moves,
        ticks: engine.ticks()?,
        final_status: engine.status_snapshot()?,
        survivors: engine.world()?.sensor_data.survivors.clone(),
        events: log.entries().cloned().collect(),
    };

    engine.stop_session();
    Ok(summary)
}

fn output_summary(summary: &PatrolSummary, format: &str) {
    match format {
        "json" => match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize summary: {}", e),
        },
        _ => {
            println!("=== PATROL SUMMARY ===");
            println!("Session: {}", summary.session_id);
            println!("Seed: {}", summary.seed);
            println!(
                "Steps: {} ({} moves accepted, {} rejected)",
                summary.steps, summary.accepted_moves, summary.rejected_moves
            );
            println!("Ticks: {}", summary.ticks);
            println!(
                "Final: {} at {} heading {}°, battery {:.1}%",
                summary.final_status.status,
                summary.final_status.position,
                summary.final_status.orientation,
                summary.final_status.battery_level
            );
            println!("Survivors found: {}", summary.survivors.len());
            for survivor in &summary.survivors {
                println!(
                    "  {} ({:?}) at {}, {} min remaining",
                    survivor.name, survivor.status, survivor.position, survivor.time_remaining
                );
            }
            println!();
            println!("Event log:");
            for entry in &summary.events {
                println!("  [{:?}] {}", entry.category, entry.message);
            }
        }
    }
}
