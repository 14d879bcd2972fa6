//! Simulation configuration with documented constants
//!
//! All magic numbers of the rover simulation are collected here with
//! explanations of their purpose and how they interact with each other.
//! Values can be overridden from a TOML file; any field left out keeps its
//! default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RoverError};
use crate::core::types::Vec2;
use crate::world::obstacle::Obstacle;

/// Configuration for the rover simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === SESSION START STATE ===
    /// Where the rover is placed when a session starts (world units)
    pub start_position: Vec2,

    /// Heading at session start in degrees (0 = +x axis, 90 = +y axis)
    pub start_orientation: i32,

    /// Battery percentage at session start
    pub start_battery: f64,

    // === BATTERY STATE MACHINE ===
    /// Battery gained per tick while recharging
    ///
    /// At 0.5 per tick a rover that latched at 5% needs 150 ticks
    /// (two and a half minutes at the default tick period) to resume.
    pub recharge_rate: f64,

    /// At or below this level the rover latches into recharging
    pub recharge_enter_level: f64,

    /// At or above this level recharging ends
    pub recharge_exit_level: f64,

    /// Drain per tick while the rover is moving
    pub moving_drain: f64,

    /// Drain per tick while the rover is idle
    pub idle_drain: f64,

    /// Extra drain charged for every accepted move command
    pub move_cost: f64,

    /// Communication drops strictly below this level and returns at or above it
    ///
    /// Must sit above `recharge_enter_level`, otherwise the rover would start
    /// recharging before it ever goes silent.
    pub comm_loss_level: f64,

    // === MOVEMENT ===
    /// Distance covered by one accepted move command
    pub step_distance: f64,

    // === SENSORS ===
    /// Obstacles closer than this produce a proximity reading
    pub proximity_range: f64,

    /// Number of LIDAR rays in one sweep, evenly spread over 360°
    pub lidar_rays: usize,

    /// LIDAR ray length when nothing is hit
    pub lidar_max_range: f64,

    /// Half-width of the cone (radians) in which an obstacle clips a ray
    pub lidar_angular_tolerance: f64,

    /// Upper bound of the uniform noise added to every LIDAR distance
    pub lidar_noise: f64,

    /// Survivors within this distance of the rover are detected
    pub detection_radius: f64,

    // === WORLD ===
    /// Fixed obstacle field, immutable for the lifetime of a session
    pub obstacles: Vec<Obstacle>,

    // === RUNTIME ===
    /// Period of the background battery tick in milliseconds
    pub tick_period_ms: u64,

    /// Seed for sensor noise and survivor vitals; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_position: Vec2::new(10.0, 10.0),
            start_orientation: 90,
            start_battery: 70.0,

            recharge_rate: 0.5,
            recharge_enter_level: 5.0,
            recharge_exit_level: 80.0,
            moving_drain: 0.05,
            idle_drain: 0.01,
            move_cost: 0.1,
            comm_loss_level: 10.0,

            step_distance: 0.5,

            proximity_range: 10.0,
            lidar_rays: 24,
            lidar_max_range: 20.0,
            lidar_angular_tolerance: 0.2,
            lidar_noise: 0.5,
            detection_radius: 5.0,

            obstacles: Obstacle::default_field(),

            tick_period_ms: 1000,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("start_position.x", self.start_position.x),
            ("start_position.y", self.start_position.y),
            ("start_battery", self.start_battery),
            ("recharge_rate", self.recharge_rate),
            ("recharge_enter_level", self.recharge_enter_level),
            ("recharge_exit_level", self.recharge_exit_level),
            ("moving_drain", self.moving_drain),
            ("idle_drain", self.idle_drain),
            ("move_cost", self.move_cost),
            ("comm_loss_level", self.comm_loss_level),
            ("step_distance", self.step_distance),
            ("proximity_range", self.proximity_range),
            ("lidar_max_range", self.lidar_max_range),
            ("lidar_angular_tolerance", self.lidar_angular_tolerance),
            ("lidar_noise", self.lidar_noise),
            ("detection_radius", self.detection_radius),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RoverError::Config(format!("{} ({}) must be finite", name, value)));
        }
        if let Some(o) = self
            .obstacles
            .iter()
            .find(|o| !(o.x.is_finite() && o.y.is_finite() && o.radius.is_finite()))
        {
            return Err(RoverError::Config(format!(
                "obstacle ({}, {}, r{}) must have finite values",
                o.x, o.y, o.radius
            )));
        }

        if !(0.0..=100.0).contains(&self.start_battery) {
            return Err(RoverError::Config(format!(
                "start_battery ({}) must be within 0..=100",
                self.start_battery
            )));
        }

        // Threshold ladder: recharge latch < comm loss < recharge exit
        if self.recharge_enter_level >= self.comm_loss_level {
            return Err(RoverError::Config(format!(
                "recharge_enter_level ({}) should be < comm_loss_level ({})",
                self.recharge_enter_level, self.comm_loss_level
            )));
        }
        if self.comm_loss_level >= self.recharge_exit_level || self.recharge_exit_level > 100.0 {
            return Err(RoverError::Config(format!(
                "comm_loss_level ({}) should be < recharge_exit_level ({}) <= 100",
                self.comm_loss_level, self.recharge_exit_level
            )));
        }

        if self.recharge_rate <= 0.0 {
            return Err(RoverError::Config("recharge_rate must be positive".into()));
        }
        if self.moving_drain < 0.0 || self.idle_drain < 0.0 || self.move_cost < 0.0 {
            return Err(RoverError::Config("drain rates must not be negative".into()));
        }

        if self.step_distance <= 0.0 {
            return Err(RoverError::Config("step_distance must be positive".into()));
        }

        if self.lidar_rays == 0 {
            return Err(RoverError::Config("lidar_rays must be at least 1".into()));
        }
        if self.lidar_max_range <= 0.0 || self.proximity_range <= 0.0 {
            return Err(RoverError::Config("sensor ranges must be positive".into()));
        }
        if self.lidar_noise < 0.0 || self.lidar_angular_tolerance < 0.0 {
            return Err(RoverError::Config(
                "lidar_noise and lidar_angular_tolerance must not be negative".into(),
            ));
        }
        if self.detection_radius < 0.0 {
            return Err(RoverError::Config("detection_radius must not be negative".into()));
        }

        if self.tick_period_ms == 0 {
            return Err(RoverError::Config("tick_period_ms must be positive".into()));
        }

        if let Some(obstacle) = self.obstacles.iter().find(|o| o.radius <= 0.0) {
            return Err(RoverError::Config(format!(
                "obstacle at ({}, {}) has non-positive radius {}",
                obstacle.x, obstacle.y, obstacle.radius
            )));
        }

        Ok(())
    }
}
