//! Movement commands and their effect on the rover
//!
//! Blocked and invalid commands never touch the world state; they come back
//! as `CommandResult::Error` carrying a typed `Rejection`.

use serde::Serialize;
use thiserror::Error;

use crate::core::config::SimulationConfig;
use crate::core::types::{normalize_degrees, Vec2};
use crate::simulation::battery;
use crate::world::obstacle::is_position_valid;
use crate::world::state::{Motion, WorldState};

/// A resolved movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommand {
    /// Face the given heading (degrees) and step forward
    Directional(i32),
    Forward,
    Backward,
    /// Rotate 90° counter to heading order, no displacement
    Left,
    /// Rotate 90° in heading order, no displacement
    Right,
}

impl MoveCommand {
    /// Resolve a command name plus optional target heading
    pub fn parse(name: &str, target_orientation: Option<i32>) -> Result<Self, Rejection> {
        match name {
            "directional" => target_orientation
                .map(MoveCommand::Directional)
                .ok_or(Rejection::MissingTargetOrientation),
            "forward" => Ok(MoveCommand::Forward),
            "backward" => Ok(MoveCommand::Backward),
            "left" => Ok(MoveCommand::Left),
            "right" => Ok(MoveCommand::Right),
            other => Err(Rejection::InvalidCommand(other.to_string())),
        }
    }

    /// Human-readable direction for log lines
    pub fn describe(&self) -> String {
        match self {
            MoveCommand::Directional(heading) => match normalize_degrees(*heading) {
                0 => "north".into(),
                90 => "east".into(),
                180 => "south".into(),
                270 => "west".into(),
                other => format!("in direction {}", other),
            },
            MoveCommand::Forward => "forward".into(),
            MoveCommand::Backward => "backward".into(),
            MoveCommand::Left => "left".into(),
            MoveCommand::Right => "right".into(),
        }
    }
}

/// Why a command was not carried out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Communication lost with rover")]
    CommunicationLost,

    #[error("Cannot move while recharging")]
    Recharging,

    #[error("Cannot move in that direction - obstacle detected")]
    Collision,

    #[error("Invalid direction: {0}")]
    InvalidCommand(String),

    #[error("Directional movement requires a target orientation")]
    MissingTargetOrientation,
}

/// Outcome of `move_rover` / `stop_rover`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    Success {
        message: String,
        #[serde(rename = "newPosition", skip_serializing_if = "Option::is_none")]
        new_position: Option<Vec2>,
        #[serde(rename = "newOrientation", skip_serializing_if = "Option::is_none")]
        new_orientation: Option<u16>,
    },
    Error {
        message: String,
        #[serde(skip)]
        reason: Rejection,
    },
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        CommandResult::Success {
            message: message.into(),
            new_position: None,
            new_orientation: None,
        }
    }

    pub fn rejected(reason: Rejection) -> Self {
        CommandResult::Error {
            message: reason.to_string(),
            reason,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            CommandResult::Success { message, .. } | CommandResult::Error { message, .. } => {
                message
            }
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            CommandResult::Error { reason, .. } => Some(reason),
            CommandResult::Success { .. } => None,
        }
    }
}

/// Recharging outranks communication loss when both hold
fn gate(state: &WorldState) -> Result<(), Rejection> {
    if state.is_recharging {
        Err(Rejection::Recharging)
    } else if !state.communication_active {
        Err(Rejection::CommunicationLost)
    } else {
        Ok(())
    }
}

/// Apply a movement command to the world
pub fn apply_move(
    state: &mut WorldState,
    config: &SimulationConfig,
    command: MoveCommand,
) -> CommandResult {
    if let Err(reason) = gate(state) {
        return CommandResult::rejected(reason);
    }

    let (heading, multiplier) = match command {
        MoveCommand::Left | MoveCommand::Right => {
            let delta = if command == MoveCommand::Left { -90 } else { 90 };
            state.orientation = normalize_degrees(state.orientation as i32 + delta);
            return CommandResult::Success {
                message: format!("Turned {}", command.describe()),
                new_position: Some(state.position),
                new_orientation: Some(state.orientation),
            };
        }
        MoveCommand::Directional(target) => (normalize_degrees(target), 1.0),
        MoveCommand::Forward => (state.orientation, 1.0),
        MoveCommand::Backward => (state.orientation, -1.0),
    };

    let candidate =
        state.position + Vec2::from_heading(heading as f64) * (config.step_distance * multiplier);

    if !is_position_valid(&state.obstacles, candidate) {
        return CommandResult::rejected(Rejection::Collision);
    }

    state.orientation = heading;
    state.position = candidate;
    state.motion = Motion::Moving;
    battery::charge_move(state, config);

    // Directional moves face the target first, so they travel forward
    let travelled = if multiplier < 0.0 { "backward" } else { "forward" };
    CommandResult::Success {
        message: format!("Moved {}", travelled),
        new_position: Some(state.position),
        new_orientation: Some(state.orientation),
    }
}

/// Bring the rover to a halt
pub fn apply_stop(state: &mut WorldState) -> CommandResult {
    if !state.communication_active {
        return CommandResult::rejected(Rejection::CommunicationLost);
    }
    if !state.is_recharging {
        state.motion = Motion::Idle;
    }
    CommandResult::success("Rover stopped")
}
