//! Simulation engine - the single owner of rover state
//!
//! The engine holds at most one active session. Every public operation is
//! synchronous and mutates the world in place. Calling anything but
//! `start_session`/`stop_session` without an active session is the one hard
//! failure (`RoverError::NoActiveSession`); every operational refusal is a
//! structured `CommandResult::Error` instead.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, RoverError};
use crate::core::types::{SessionId, Tick, Vec2};
use crate::simulation::battery::{self, BatteryTransition};
use crate::simulation::detection;
use crate::simulation::movement::{self, CommandResult, MoveCommand};
use crate::simulation::sensors::{self, SensorReport};
use crate::world::state::{Disaster, RoverStatus, SensorSnapshot, WorldState};
use crate::world::survivor::Survivor;

const ROVER_ID: &str = "rover-1";
const ROVER_NAME: &str = "Rescue Rover";
const ROVER_MISSION: &str = "Search and rescue";
const COMM_LOST_MESSAGE: &str = "Communication lost with rover";
const RECHARGING_SENSOR_MESSAGE: &str = "Rover in recharging mode, sensor readings limited";

/// Answer to `get_rover_status`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status: RoverStatus,
    pub position: Vec2,
    pub orientation: u16,
    pub battery_level: f64,
    pub is_recharging: bool,
    pub communication_active: bool,
}

impl StatusSnapshot {
    fn of(world: &WorldState) -> Self {
        Self {
            status: world.status(),
            position: world.position,
            orientation: world.orientation,
            battery_level: world.battery_level,
            is_recharging: world.is_recharging,
            communication_active: world.communication_active,
        }
    }
}

/// One row of `get_fleet_status`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetEntry {
    pub id: String,
    pub name: String,
    pub status: RoverStatus,
    pub battery_level: f64,
    pub is_recharging: bool,
    pub communication_active: bool,
    pub position: Vec2,
    pub mission: String,
}

/// Answer to `get_disaster_data`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DisasterReport {
    Success { data: Vec<Disaster> },
    Error { message: String, data: Vec<Disaster> },
}

struct ActiveSession {
    id: SessionId,
    world: WorldState,
    ticks: Tick,
}

pub struct SimulationEngine {
    config: SimulationConfig,
    rng: ChaCha8Rng,
    session: Option<ActiveSession>,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng,
            session: None,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(|s| &s.id)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Ticks run since the session started
    pub fn ticks(&self) -> Result<Tick> {
        Ok(self.active()?.ticks)
    }

    /// Read-only view of the world
    pub fn world(&self) -> Result<&WorldState> {
        Ok(&self.active()?.world)
    }

    /// Direct access to the world, for scenario setup
    pub fn world_mut(&mut self) -> Result<&mut WorldState> {
        Ok(&mut self.active_mut()?.world)
    }

    fn active(&self) -> Result<&ActiveSession> {
        self.session.as_ref().ok_or(RoverError::NoActiveSession)
    }

    fn active_mut(&mut self) -> Result<&mut ActiveSession> {
        self.session.as_mut().ok_or(RoverError::NoActiveSession)
    }

    /// Start a fresh session, replacing any previous one
    pub fn start_session(&mut self) -> SessionId {
        if let Some(previous) = &self.session {
            info!(session = %previous.id, "replacing active session");
        }

        let id = SessionId::new();
        let world = WorldState::new(&self.config, &mut self.rng);
        info!(
            session = %id,
            survivors = world.survivors.len(),
            obstacles = world.obstacles.len(),
            "session started"
        );

        self.session = Some(ActiveSession {
            id: id.clone(),
            world,
            ticks: 0,
        });
        id
    }

    /// End the session. Does nothing when none is active.
    pub fn stop_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!(session = %session.id, ticks = session.ticks, "session stopped");
        }
    }

    /// One battery tick
    pub fn tick(&mut self) -> Result<Vec<BatteryTransition>> {
        let config = &self.config;
        let session = self.session.as_mut().ok_or(RoverError::NoActiveSession)?;

        session.ticks += 1;
        let transitions = battery::step(&mut session.world, config);
        for transition in &transitions {
            info!(tick = session.ticks, ?transition, "battery transition");
        }
        Ok(transitions)
    }

    /// Run `ticks` battery ticks back to back
    pub fn advance(&mut self, ticks: u64) -> Result<Vec<BatteryTransition>> {
        let mut transitions = Vec::new();
        for _ in 0..ticks {
            transitions.extend(self.tick()?);
        }
        Ok(transitions)
    }

    /// Current status; also evaluates the battery state machine once
    pub fn get_rover_status(&mut self) -> Result<StatusSnapshot> {
        let config = &self.config;
        let session = self.session.as_mut().ok_or(RoverError::NoActiveSession)?;

        for transition in battery::step(&mut session.world, config) {
            info!(?transition, "battery transition on status query");
        }
        Ok(StatusSnapshot::of(&session.world))
    }

    /// Current status without advancing the battery
    pub fn status_snapshot(&self) -> Result<StatusSnapshot> {
        Ok(StatusSnapshot::of(&self.active()?.world))
    }

    pub fn get_sensor_data(&mut self) -> Result<SensorReport> {
        let config = &self.config;
        let rng = &mut self.rng;
        let session = self.session.as_mut().ok_or(RoverError::NoActiveSession)?;
        let world = &mut session.world;

        if !world.communication_active {
            return Ok(SensorReport::CommunicationLost {
                message: COMM_LOST_MESSAGE.into(),
                last_known: SensorSnapshot::default(),
            });
        }

        if world.is_recharging {
            return Ok(SensorReport::Limited {
                message: RECHARGING_SENSOR_MESSAGE.into(),
                snapshot: world.sensor_data.clone(),
            });
        }

        sensors::sample_environment(&mut world.sensor_data, rng);
        world.sensor_data.proximity = sensors::proximity_sweep(world.position, &world.obstacles, config);
        world.sensor_data.lidar = sensors::lidar_sweep(world.position, &world.obstacles, config, rng);

        let detected = detection::check_for_survivors(world, config);
        for survivor in detection::merge_detected(world, detected) {
            info!(
                survivor = %survivor.id,
                position = %survivor.position,
                status = ?survivor.status,
                "survivor detected"
            );
        }

        Ok(SensorReport::Live {
            snapshot: world.sensor_data.clone(),
        })
    }

    /// Survivors in range that have not been reported yet. Does not record them.
    pub fn check_for_survivors(&self) -> Result<Vec<Survivor>> {
        let session = self.active()?;
        Ok(detection::check_for_survivors(&session.world, &self.config))
    }

    /// Move by command name, e.g. `("directional", Some(90))` or `("left", None)`
    pub fn move_rover(
        &mut self,
        command: &str,
        target_orientation: Option<i32>,
    ) -> Result<CommandResult> {
        // Session check comes first so a bad command never masks a missing session
        self.active()?;
        match MoveCommand::parse(command, target_orientation) {
            Ok(command) => self.apply_command(command),
            Err(reason) => {
                warn!(command, %reason, "rejected movement command");
                Ok(CommandResult::rejected(reason))
            }
        }
    }

    pub fn apply_command(&mut self, command: MoveCommand) -> Result<CommandResult> {
        let config = &self.config;
        let session = self.session.as_mut().ok_or(RoverError::NoActiveSession)?;

        let result = movement::apply_move(&mut session.world, config, command);
        match &result {
            CommandResult::Success { .. } => debug!(
                ?command,
                position = %session.world.position,
                orientation = session.world.orientation,
                battery = session.world.battery_level,
                "move accepted"
            ),
            CommandResult::Error { reason, .. } => {
                warn!(?command, %reason, "move rejected")
            }
        }
        Ok(result)
    }

    pub fn stop_rover(&mut self) -> Result<CommandResult> {
        let session = self.active_mut()?;
        let result = movement::apply_stop(&mut session.world);
        debug!(success = result.is_success(), "stop requested");
        Ok(result)
    }

    /// Always a single entry: this engine drives one rover
    pub fn get_fleet_status(&self) -> Result<Vec<FleetEntry>> {
        let world = &self.active()?.world;
        Ok(vec![FleetEntry {
            id: ROVER_ID.into(),
            name: ROVER_NAME.into(),
            status: world.status(),
            battery_level: world.battery_level,
            is_recharging: world.is_recharging,
            communication_active: world.communication_active,
            position: world.position,
            mission: ROVER_MISSION.into(),
        }])
    }

    pub fn get_disaster_data(&self) -> Result<DisasterReport> {
        let world = &self.active()?.world;
        if !world.communication_active {
            return Ok(DisasterReport::Error {
                message: COMM_LOST_MESSAGE.into(),
                data: Vec::new(),
            });
        }
        Ok(DisasterReport::Success {
            data: world.disasters.clone(),
        })
    }
}
