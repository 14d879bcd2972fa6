//! Turns successive engine snapshots into operator log lines
//!
//! The monitor only ever sees what a remote operator would see: status
//! snapshots, sensor reports and command results. Every message is
//! edge-triggered on the difference from the previous observation, so each
//! transition is logged exactly once.

use ahash::AHashSet;

use crate::core::config::SimulationConfig;
use crate::simulation::engine::StatusSnapshot;
use crate::simulation::movement::{CommandResult, MoveCommand};
use crate::simulation::sensors::SensorReport;
use crate::ui::event_log::{EventLog, LogCategory};

/// Battery levels at which the monitor raises warnings
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
    critical: f64,
    recharged: f64,
    comm_warning: f64,
}

impl Thresholds {
    fn from_config(config: &SimulationConfig) -> Self {
        Self {
            critical: config.recharge_enter_level,
            recharged: config.recharge_exit_level,
            comm_warning: config.comm_loss_level,
        }
    }
}

#[derive(Debug)]
pub struct StatusMonitor {
    thresholds: Thresholds,
    last: Option<StatusSnapshot>,
    seen_survivors: AHashSet<String>,
}

impl Default for StatusMonitor {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

impl StatusMonitor {
    /// Monitor warning at the battery thresholds of `config`
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            thresholds: Thresholds::from_config(config),
            last: None,
            seen_survivors: AHashSet::new(),
        }
    }

    pub fn session_started(&mut self, log: &mut EventLog) {
        self.last = None;
        self.seen_survivors.clear();
        log.log("Session started. Connected to rover.", LogCategory::Session);
    }

    pub fn session_stopped(&mut self, log: &mut EventLog) {
        self.last = None;
        log.log("Session stopped. Disconnected from rover.", LogCategory::Session);
    }

    /// Diff a status snapshot against the previous one
    pub fn observe_status(&mut self, status: &StatusSnapshot, log: &mut EventLog) {
        let Some(prev) = self.last.replace(status.clone()) else {
            return;
        };
        let level = status.battery_level;
        let Thresholds {
            critical,
            recharged,
            comm_warning,
        } = self.thresholds;

        if level <= critical && prev.battery_level > critical {
            log.log(
                format!("Warning: Battery critically low ({:.1}%). Starting recharge.", level),
                LogCategory::Battery,
            );
        } else if level >= recharged && prev.battery_level < recharged && prev.is_recharging {
            log.log(
                format!("Battery reached {:.1}%. Recharging complete.", level),
                LogCategory::Battery,
            );
        } else if level < comm_warning && prev.battery_level >= comm_warning {
            log.log(
                format!(
                    "Warning: Battery below {}% ({:.1}%). Communication may be lost.",
                    comm_warning, level
                ),
                LogCategory::Battery,
            );
        }

        if status.is_recharging != prev.is_recharging {
            let message = if status.is_recharging {
                "Rover entered recharging mode. Operations paused."
            } else {
                "Rover exited recharging mode. Operations resumed."
            };
            log.log(message, LogCategory::Battery);
        }

        if status.communication_active != prev.communication_active {
            if status.communication_active {
                log.log("Communication re-established with rover.", LogCategory::Communication);
            } else {
                log.log(
                    format!("Communication lost with rover. Battery level: {:.1}%", level),
                    LogCategory::Communication,
                );
            }
        }
    }

    /// Log survivors appearing in a sensor report for the first time
    pub fn observe_sensors(&mut self, report: &SensorReport, log: &mut EventLog) {
        for survivor in &report.snapshot().survivors {
            if self.seen_survivors.insert(survivor.id.clone()) {
                log.log(
                    format!("Survivor detected: {} at position {}", survivor.name, survivor.position),
                    LogCategory::Survivor,
                );
            }
        }
    }

    pub fn observe_command(&mut self, command: MoveCommand, result: &CommandResult, log: &mut EventLog) {
        if result.is_success() {
            log.log(format!("Moving rover {}", command.describe()), LogCategory::Movement);
        } else {
            log.log(format!("Failed to move rover: {}", result.message()), LogCategory::Movement);
        }
    }

    pub fn observe_stop(&mut self, result: &CommandResult, log: &mut EventLog) {
        let category = LogCategory::Movement;
        if result.is_success() {
            log.log(result.message(), category);
        } else {
            log.log(format!("Failed to stop rover: {}", result.message()), category);
        }
    }

    pub fn survivors_seen(&self) -> usize {
        self.seen_survivors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::simulation::movement::Rejection;
    use crate::world::state::RoverStatus;

    fn snapshot(level: f64, recharging: bool, comms: bool) -> StatusSnapshot {
        StatusSnapshot {
            status: RoverStatus::derive(recharging, comms, Default::default()),
            position: Vec2::new(10.0, 10.0),
            orientation: 90,
            battery_level: level,
            is_recharging: recharging,
            communication_active: comms,
        }
    }

    fn messages(log: &EventLog) -> Vec<String> {
        log.entries().map(|e| e.message.clone()).collect()
    }

    #[test]
    fn test_first_snapshot_is_baseline() {
        let mut monitor = StatusMonitor::default();
        let mut log = EventLog::new();
        monitor.observe_status(&snapshot(3.0, true, false), &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn test_comm_loss_logged_once() {
        let mut monitor = StatusMonitor::default();
        let mut log = EventLog::new();

        monitor.observe_status(&snapshot(10.02, false, true), &mut log);
        monitor.observe_status(&snapshot(9.99, false, false), &mut log);
        monitor.observe_status(&snapshot(9.98, false, false), &mut log);

        assert_eq!(
            messages(&log),
            [
                "Warning: Battery below 10% (10.0%). Communication may be lost.",
                "Communication lost with rover. Battery level: 10.0%",
            ]
        );
    }

    #[test]
    fn test_recharge_cycle_messages() {
        let mut monitor = StatusMonitor::default();
        let mut log = EventLog::new();

        monitor.observe_status(&snapshot(5.004, false, false), &mut log);
        monitor.observe_status(&snapshot(4.994, false, false), &mut log);
        monitor.observe_status(&snapshot(4.994, true, false), &mut log);
        monitor.observe_status(&snapshot(79.994, true, true), &mut log);
        monitor.observe_status(&snapshot(80.494, false, true), &mut log);

        assert_eq!(
            messages(&log),
            [
                "Warning: Battery critically low (5.0%). Starting recharge.",
                "Rover entered recharging mode. Operations paused.",
                "Communication re-established with rover.",
                "Battery reached 80.5%. Recharging complete.",
                "Rover exited recharging mode. Operations resumed.",
            ]
        );
    }

    #[test]
    fn test_command_messages() {
        let mut monitor = StatusMonitor::default();
        let mut log = EventLog::new();

        let ok = CommandResult::success("Moved east");
        monitor.observe_command(MoveCommand::Directional(90), &ok, &mut log);
        monitor.observe_command(MoveCommand::Directional(45), &ok, &mut log);
        let blocked = CommandResult::rejected(Rejection::Collision);
        monitor.observe_command(MoveCommand::Forward, &blocked, &mut log);

        assert_eq!(
            messages(&log),
            [
                "Moving rover east",
                "Moving rover in direction 45",
                "Failed to move rover: Cannot move in that direction - obstacle detected",
            ]
        );
    }

    #[test]
    fn test_warnings_follow_configured_thresholds() {
        let config = SimulationConfig {
            recharge_enter_level: 10.0,
            comm_loss_level: 20.0,
            recharge_exit_level: 90.0,
            ..SimulationConfig::default()
        };
        let mut monitor = StatusMonitor::new(&config);
        let mut log = EventLog::new();

        monitor.observe_status(&snapshot(20.004, false, true), &mut log);
        monitor.observe_status(&snapshot(19.994, false, false), &mut log);
        monitor.observe_status(&snapshot(10.004, false, false), &mut log);
        monitor.observe_status(&snapshot(9.994, false, false), &mut log);
        monitor.observe_status(&snapshot(89.994, true, true), &mut log);
        monitor.observe_status(&snapshot(90.494, false, true), &mut log);

        let battery: Vec<String> = log
            .entries()
            .filter(|e| e.category == LogCategory::Battery && e.message.contains('%'))
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(
            battery,
            [
                "Warning: Battery below 20% (20.0%). Communication may be lost.",
                "Warning: Battery critically low (10.0%). Starting recharge.",
                "Battery reached 90.5%. Recharging complete.",
            ]
        );

        // Default thresholds would not have warned at 20%
        let mut monitor = StatusMonitor::default();
        let mut log = EventLog::new();
        monitor.observe_status(&snapshot(20.004, false, true), &mut log);
        monitor.observe_status(&snapshot(19.994, false, true), &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn test_session_restart_forgets_survivors() {
        let mut monitor = StatusMonitor::default();
        let mut log = EventLog::new();
        monitor.seen_survivors.insert("survivor-1".into());

        monitor.session_started(&mut log);
        assert_eq!(monitor.survivors_seen(), 0);
        assert_eq!(log.last().unwrap().category, LogCategory::Session);
    }
}
