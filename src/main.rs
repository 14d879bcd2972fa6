//! Rescue Rover - Operator Console
//!
//! Starts a session with a live battery ticker and reads operator commands
//! from stdin. Status changes, survivor detections and command outcomes are
//! collected in the event log and printed after every command.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use rescue_rover::command::{parse_input, ConsoleCommand};
use rescue_rover::core::config::SimulationConfig;
use rescue_rover::core::error::Result;
use rescue_rover::session::SessionRunner;
use rescue_rover::simulation::engine::StatusSnapshot;
use rescue_rover::simulation::sensors::SensorReport;
use rescue_rover::ui::{EventLog, StatusMonitor};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Interactive search-and-rescue rover console
#[derive(Parser, Debug)]
#[command(name = "rescue-rover")]
#[command(about = "Drive a simulated search-and-rescue rover from the terminal")]
struct Args {
    /// Simulation config file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic survivor vitals and sensor noise
    #[arg(long)]
    seed: Option<u64>,

    /// Battery tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

struct Console {
    runner: SessionRunner,
    log: EventLog,
    monitor: StatusMonitor,
    printed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rescue_rover=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_period_ms = tick_ms;
    }

    // The ticker runs on the runtime's worker threads while stdin blocks here
    let rt = Runtime::new()?;
    let _guard = rt.enter();

    tracing::info!(tick_ms = config.tick_period_ms, seed = ?config.seed, "rescue rover starting");

    let monitor = StatusMonitor::new(&config);
    let mut console = Console {
        runner: SessionRunner::new(config)?,
        log: EventLog::new(),
        monitor,
        printed: 0,
    };

    print_help();
    console.start()?;

    loop {
        console.refresh();
        console.flush_log();

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match parse_input(&input) {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Empty => continue,
            command => {
                if let Err(e) = console.execute(command) {
                    println!("Error: {}", e);
                }
            }
        }
    }

    console.runner.stop_session();
    println!("\nGoodbye!");
    Ok(())
}

impl Console {
    fn start(&mut self) -> Result<()> {
        let id = self.runner.start_session()?;
        println!("Session {}", id);
        self.monitor.session_started(&mut self.log);
        let status = self.runner.status_snapshot()?;
        self.monitor.observe_status(&status, &mut self.log);
        Ok(())
    }

    /// Feed the monitor without advancing the battery
    fn refresh(&mut self) {
        if let Ok(status) = self.runner.status_snapshot() {
            self.monitor.observe_status(&status, &mut self.log);
        }
    }

    fn flush_log(&mut self) {
        for entry in self.log.since(self.printed) {
            println!("  [{:?}] {}", entry.category, entry.message);
        }
        self.printed = self.log.next_sequence();
    }

    fn execute(&mut self, command: ConsoleCommand) -> Result<()> {
        match command {
            ConsoleCommand::Move(movement) => {
                let result = self.runner.apply_command(movement)?;
                println!("{}", result.message());
                self.monitor.observe_command(movement, &result, &mut self.log);
            }
            ConsoleCommand::Stop => {
                let result = self.runner.stop_rover()?;
                self.monitor.observe_stop(&result, &mut self.log);
            }
            ConsoleCommand::Start => self.start()?,
            ConsoleCommand::End => {
                self.runner.stop_session();
                self.monitor.session_stopped(&mut self.log);
            }
            ConsoleCommand::Status => {
                let status = self.runner.get_rover_status()?;
                display_status(&status);
                self.monitor.observe_status(&status, &mut self.log);
            }
            ConsoleCommand::Sensors => {
                let report = self.runner.get_sensor_data()?;
                display_sensors(&report);
                self.monitor.observe_sensors(&report, &mut self.log);
            }
            ConsoleCommand::Fleet => {
                let fleet = self.runner.get_fleet_status()?;
                println!("{}", serde_json::to_string_pretty(&fleet)?);
            }
            ConsoleCommand::Disasters => {
                let report = self.runner.get_disaster_data()?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            ConsoleCommand::Log => {
                for entry in self.log.entries() {
                    println!("  #{:<4} [{:?}] {}", entry.sequence, entry.category, entry.message);
                }
            }
            ConsoleCommand::Tick(n) => {
                for _ in 0..n {
                    self.runner.tick()?;
                }
                println!("Ran {} tick(s).", n);
            }
            ConsoleCommand::Help => print_help(),
            ConsoleCommand::Unknown(input) => {
                println!("Unknown command '{}'. Type 'help' for a list.", input);
            }
            ConsoleCommand::Quit | ConsoleCommand::Empty => {}
        }
        Ok(())
    }
}

fn print_help() {
    println!("\n=== RESCUE ROVER ===");
    println!("Search-and-rescue rover simulation");
    println!();
    println!("Commands:");
    println!("  w/a/s/d, north/east/south/west - Move one step in that direction");
    println!("  forward/backward               - Move along the current heading");
    println!("  left/right                     - Turn 90 degrees in place");
    println!("  heading <deg>                  - Move one step towards a heading");
    println!("  stop / x                       - Stop the rover");
    println!("  status                         - Rover status (runs one battery step)");
    println!("  sensors                        - Sensor sweep and survivor check");
    println!("  fleet / disasters              - Fleet and disaster reports");
    println!("  tick [n]                       - Run n battery ticks now");
    println!("  log                            - Show the event log");
    println!("  start / end                    - Start a new session / end it");
    println!("  quit / q                       - Exit");
    println!();
}

fn display_status(status: &StatusSnapshot) {
    println!(
        "--- {} | Battery: {:.1}% | Position: {} | Heading: {}° ---",
        status.status, status.battery_level, status.position, status.orientation
    );
    if status.is_recharging {
        println!("  Recharging: movement and sensors limited");
    }
    if !status.communication_active {
        println!("  Communication lost: waiting for battery to recover");
    }
}

fn display_sensors(report: &SensorReport) {
    if let SensorReport::Limited { message, .. } | SensorReport::CommunicationLost { message, .. } =
        report
    {
        println!("{}", message);
    }

    let data = report.snapshot();
    if let (Some(t), Some(h), Some(p), Some(r)) =
        (data.temperature, data.humidity, data.pressure, data.radiation)
    {
        println!(
            "  Temp {:.1}°C  Humidity {:.1}%  Pressure {:.1} hPa  Radiation {:.2} mSv",
            t, h, p, r
        );
    }
    for reading in &data.proximity {
        println!(
            "  Obstacle at {:.1} units, bearing {:.0}°",
            reading.distance, reading.angle
        );
    }
    if !data.lidar.is_empty() {
        let nearest = data.lidar.iter().map(|l| l.distance).fold(f64::INFINITY, f64::min);
        println!("  LIDAR: {} rays, nearest return {:.1}", data.lidar.len(), nearest);
    }
    for survivor in &data.survivors {
        println!(
            "  Survivor {} ({:?}) at {}, {} min remaining",
            survivor.name, survivor.status, survivor.position, survivor.time_remaining
        );
    }
}
