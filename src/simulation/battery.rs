//! Battery and communication state machine
//!
//! One `step` is one tick. The drain/recharge rules run first and the
//! communication check second, so a level that crosses a threshold during the
//! drain is seen by the communication check in the same step.
//!
//! ```text
//!   recharging: +recharge_rate, exit at >= recharge_exit_level
//!   <= recharge_enter_level: latch recharging
//!   moving: -moving_drain
//!   otherwise: -idle_drain
//!   then: < comm_loss_level drops comms, >= comm_loss_level restores them
//! ```

use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::world::state::{Motion, RoverStatus, WorldState};

/// A state change caused by a battery step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatteryTransition {
    RechargeStarted { level: f64 },
    RechargeFinished { level: f64 },
    CommunicationLost { level: f64 },
    CommunicationRestored { level: f64 },
}

/// Run one tick of the battery state machine
pub fn step(state: &mut WorldState, config: &SimulationConfig) -> Vec<BatteryTransition> {
    let mut transitions = Vec::new();

    if state.is_recharging {
        state.battery_level = (state.battery_level + config.recharge_rate).min(100.0);

        if state.battery_level >= config.recharge_exit_level {
            state.is_recharging = false;
            state.motion = Motion::Idle;
            transitions.push(BatteryTransition::RechargeFinished {
                level: state.battery_level,
            });
        }
    } else if state.battery_level <= config.recharge_enter_level {
        state.is_recharging = true;
        state.motion = Motion::Idle;
        transitions.push(BatteryTransition::RechargeStarted {
            level: state.battery_level,
        });
    } else if state.status() == RoverStatus::Moving {
        state.battery_level = (state.battery_level - config.moving_drain).max(0.0);
    } else {
        state.battery_level = (state.battery_level - config.idle_drain).max(0.0);
    }

    if state.battery_level < config.comm_loss_level && state.communication_active {
        state.communication_active = false;
        state.motion = Motion::Idle;
        transitions.push(BatteryTransition::CommunicationLost {
            level: state.battery_level,
        });
    } else if state.battery_level >= config.comm_loss_level && !state.communication_active {
        state.communication_active = true;
        state.motion = Motion::Idle;
        transitions.push(BatteryTransition::CommunicationRestored {
            level: state.battery_level,
        });
    }

    transitions
}

/// Apply `ticks` steps without any real time passing
pub fn advance(
    state: &mut WorldState,
    config: &SimulationConfig,
    ticks: u64,
) -> Vec<BatteryTransition> {
    let mut transitions = Vec::new();
    for _ in 0..ticks {
        transitions.extend(step(state, config));
    }
    transitions
}

/// Charge an accepted move against the battery
pub fn charge_move(state: &mut WorldState, config: &SimulationConfig) {
    state.battery_level = (state.battery_level - config.move_cost).max(0.0);
}
