//! Host-side owner of the engine and its battery ticker
//!
//! The engine sits behind one `parking_lot::Mutex`. The ticker task locks it
//! once per period to run a battery tick and never holds the lock across an
//! await point. At most one ticker exists at a time: starting a session
//! cancels the previous one first.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::SessionId;
use crate::simulation::battery::BatteryTransition;
use crate::simulation::engine::{DisasterReport, FleetEntry, SimulationEngine, StatusSnapshot};
use crate::simulation::movement::{CommandResult, MoveCommand};
use crate::simulation::sensors::SensorReport;
use crate::world::survivor::Survivor;

struct Ticker {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Ticker {
    fn spawn(handle: &Handle, engine: Arc<Mutex<SimulationEngine>>, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = handle.spawn(async move {
            // First tick one full period after start, not immediately
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            debug!("ticker shutdown received");
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let result = engine.lock().tick();
                        if let Err(err) = result {
                            warn!(error = %err, "ticker stopping");
                            break;
                        }
                    }
                }
            }
        });

        Self { shutdown, task }
    }

    fn cancel(self) {
        let _ = self.shutdown.send(true);
        self.task.abort();
    }
}

pub struct SessionRunner {
    engine: Arc<Mutex<SimulationEngine>>,
    period: Duration,
    ticker: Option<Ticker>,
}

impl SessionRunner {
    /// Validates `config` before building the engine
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let period = Duration::from_millis(config.tick_period_ms);
        Ok(Self {
            engine: Arc::new(Mutex::new(SimulationEngine::new(config))),
            period,
            ticker: None,
        })
    }

    /// Shared handle to the engine
    pub fn engine(&self) -> Arc<Mutex<SimulationEngine>> {
        Arc::clone(&self.engine)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.task.is_finished())
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.engine.lock().session_id().cloned()
    }

    /// Start a new session and its ticker. Must be called inside a tokio runtime.
    pub fn start_session(&mut self) -> Result<SessionId> {
        let handle = Handle::try_current()?;

        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }

        let id = self.engine.lock().start_session();
        self.ticker = Some(Ticker::spawn(&handle, self.engine(), self.period));
        info!(session = %id, period_ms = self.period.as_millis() as u64, "ticker started");
        Ok(id)
    }

    /// Cancel the ticker and end the session. Safe to call repeatedly.
    pub fn stop_session(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
            debug!("ticker cancelled");
        }
        self.engine.lock().stop_session();
    }

    pub fn tick(&self) -> Result<Vec<BatteryTransition>> {
        self.engine.lock().tick()
    }

    pub fn get_rover_status(&self) -> Result<StatusSnapshot> {
        self.engine.lock().get_rover_status()
    }

    pub fn status_snapshot(&self) -> Result<StatusSnapshot> {
        self.engine.lock().status_snapshot()
    }

    pub fn get_sensor_data(&self) -> Result<SensorReport> {
        self.engine.lock().get_sensor_data()
    }

    pub fn move_rover(&self, command: &str, target_orientation: Option<i32>) -> Result<CommandResult> {
        self.engine.lock().move_rover(command, target_orientation)
    }

    pub fn apply_command(&self, command: MoveCommand) -> Result<CommandResult> {
        self.engine.lock().apply_command(command)
    }

    pub fn stop_rover(&self) -> Result<CommandResult> {
        self.engine.lock().stop_rover()
    }

    pub fn get_fleet_status(&self) -> Result<Vec<FleetEntry>> {
        self.engine.lock().get_fleet_status()
    }

    pub fn get_disaster_data(&self) -> Result<DisasterReport> {
        self.engine.lock().get_disaster_data()
    }

    pub fn check_for_survivors(&self) -> Result<Vec<Survivor>> {
        self.engine.lock().check_for_survivors()
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
