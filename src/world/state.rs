//! Rover world state
//!
//! One `WorldState` exists per session. The rover's displayed status is not
//! stored: it is computed from the recharge and communication flags plus the
//! motion flag, so the three can never disagree.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{normalize_degrees, Vec2};
use crate::world::obstacle::Obstacle;
use crate::world::survivor::{generate_survivors, Survivor};

/// Whether the rover is under way. The only independently stored part of
/// the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    #[default]
    Idle,
    Moving,
}

/// Display status of the rover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoverStatus {
    Idle,
    Moving,
    Recharging,
    CommunicationLost,
}

impl RoverStatus {
    /// Status precedence: communication loss > recharging > motion
    pub fn derive(is_recharging: bool, communication_active: bool, motion: Motion) -> Self {
        if !communication_active {
            RoverStatus::CommunicationLost
        } else if is_recharging {
            RoverStatus::Recharging
        } else {
            match motion {
                Motion::Idle => RoverStatus::Idle,
                Motion::Moving => RoverStatus::Moving,
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoverStatus::Idle => "idle",
            RoverStatus::Moving => "moving",
            RoverStatus::Recharging => "recharging",
            RoverStatus::CommunicationLost => "communication_lost",
        }
    }
}

impl std::fmt::Display for RoverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityReading {
    /// Bearing to the obstacle in degrees, (-180, 180]
    pub angle: f64,
    pub distance: f64,
    /// 1.0 at contact, falling to 0.0 at the edge of proximity range
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LidarReading {
    /// Ray angle in degrees
    pub angle: f64,
    pub distance: f64,
}

/// The rover's most recent sensor readings plus every survivor detected so far
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub radiation: Option<f64>,
    pub proximity: Vec<ProximityReading>,
    pub lidar: Vec<LidarReading>,
    pub survivors: Vec<Survivor>,
}

impl SensorSnapshot {
    /// Readings reported before the first sweep of a session
    pub fn initial() -> Self {
        Self {
            temperature: Some(22.5),
            humidity: Some(45.0),
            pressure: Some(1013.0),
            radiation: Some(0.12),
            ..Self::default()
        }
    }
}

/// A reported disaster site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disaster {
    pub id: u32,
    pub kind: String,
    pub location: Vec2,
    pub severity: String,
}

/// Authoritative state of one session
#[derive(Debug, Clone)]
pub struct WorldState {
    pub position: Vec2,
    /// Degrees, always in 0..360
    pub orientation: u16,
    pub motion: Motion,
    pub battery_level: f64,
    pub is_recharging: bool,
    pub communication_active: bool,
    pub sensor_data: SensorSnapshot,
    pub obstacles: Vec<Obstacle>,
    /// Ground truth; detected survivors live in `sensor_data.survivors`
    pub survivors: Vec<Survivor>,
    pub disasters: Vec<Disaster>,
}

impl WorldState {
    /// Fresh state for a new session
    pub fn new<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        Self {
            position: config.start_position,
            orientation: normalize_degrees(config.start_orientation),
            motion: Motion::Idle,
            battery_level: config.start_battery,
            is_recharging: false,
            communication_active: true,
            sensor_data: SensorSnapshot::initial(),
            obstacles: config.obstacles.clone(),
            survivors: generate_survivors(rng),
            disasters: Vec::new(),
        }
    }

    pub fn status(&self) -> RoverStatus {
        RoverStatus::derive(self.is_recharging, self.communication_active, self.motion)
    }

    /// Has this survivor already been detected?
    pub fn is_detected(&self, survivor_id: &str) -> bool {
        self.sensor_data.survivors.iter().any(|s| s.id == survivor_id)
    }
}
