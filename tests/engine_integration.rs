//! Integration tests for the rover engine
//!
//! These tests drive a seeded engine through whole scenarios:
//! - Directional movement and its battery cost
//! - Collision with the default obstacle field
//! - A full drain -> comms loss -> recharge -> recovery cycle
//! - Survivor detection and what each sensor report exposes

use rescue_rover::core::config::SimulationConfig;
use rescue_rover::core::types::Vec2;
use rescue_rover::simulation::battery::BatteryTransition;
use rescue_rover::simulation::engine::{DisasterReport, SimulationEngine};
use rescue_rover::simulation::movement::Rejection;
use rescue_rover::simulation::sensors::SensorReport;
use rescue_rover::world::RoverStatus;

fn engine() -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimulationConfig::default().with_seed(2024));
    engine.start_session();
    engine
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

#[test]
fn test_directional_moves_from_start() {
    let mut engine = engine();

    for expected_x in [10.5, 11.0, 11.5] {
        let result = engine.move_rover("directional", Some(0)).unwrap();
        assert!(result.is_success(), "{}", result.message());
        assert_eq!(result.message(), "Moved forward");

        let world = engine.world().unwrap();
        assert_close(world.position.x, expected_x);
        assert_close(world.position.y, 10.0);
        assert_eq!(world.orientation, 0);
    }

    let status = engine.status_snapshot().unwrap();
    assert_close(status.battery_level, 69.7);
    assert_eq!(status.status, RoverStatus::Moving);
}

#[test]
fn test_turns_from_start_heading() {
    let mut engine = engine();

    let result = engine.move_rover("left", None).unwrap();
    assert!(result.is_success());
    assert_eq!(engine.world().unwrap().orientation, 0);

    engine.move_rover("right", None).unwrap();
    assert_eq!(engine.world().unwrap().orientation, 90);
    assert_eq!(engine.world().unwrap().position, Vec2::new(10.0, 10.0));
}

#[test]
fn test_collision_with_default_field() {
    let mut engine = engine();

    // Head straight for the obstacle at (15, 15), radius 2
    let mut accepted = 0;
    let rejected = loop {
        let result = engine.move_rover("directional", Some(45)).unwrap();
        if !result.is_success() {
            break result;
        }
        accepted += 1;
        assert!(accepted < 20, "never hit the obstacle");
    };

    assert_eq!(accepted, 10);
    assert_eq!(rejected.rejection(), Some(&Rejection::Collision));
    assert_eq!(
        rejected.message(),
        "Cannot move in that direction - obstacle detected"
    );

    let world = engine.world().unwrap();
    assert!(world.position.distance(&Vec2::new(15.0, 15.0)) >= 2.0);
    assert_close(world.battery_level, 69.0);
}

#[test]
fn test_survivor_detection_from_nearby() {
    let mut engine = engine();

    let report = engine.get_sensor_data().unwrap();
    assert!(report.is_live());
    assert!(report.snapshot().survivors.is_empty());

    engine.world_mut().unwrap().position = Vec2::new(8.0, 8.0);
    let report = engine.get_sensor_data().unwrap();
    let found: Vec<_> = report
        .snapshot()
        .survivors
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(found, ["survivor-1"]);

    // Second sweep does not duplicate
    let report = engine.get_sensor_data().unwrap();
    assert_eq!(report.snapshot().survivors.len(), 1);
    assert!(engine.check_for_survivors().unwrap().is_empty());
}

#[test]
fn test_drive_to_survivor() {
    let mut engine = engine();

    for heading in [270, 270, 270, 270, 270, 270, 180, 180, 180, 180, 180, 180] {
        assert!(engine.move_rover("directional", Some(heading)).unwrap().is_success());
        engine.get_sensor_data().unwrap();
    }

    let world = engine.world().unwrap();
    assert_close(world.position.x, 7.0);
    assert_close(world.position.y, 7.0);
    assert!(world.is_detected("survivor-1"));
    assert_eq!(world.sensor_data.survivors.len(), 1);
}

#[test]
fn test_recharge_cycle() {
    let mut engine = engine();
    engine.world_mut().unwrap().battery_level = 5.0;

    let transitions = engine.tick().unwrap();
    assert!(transitions.contains(&BatteryTransition::RechargeStarted { level: 5.0 }));
    assert_eq!(engine.status_snapshot().unwrap().status, RoverStatus::CommunicationLost);

    // Both gates hold; recharging is reported
    let blocked = engine.move_rover("forward", None).unwrap();
    assert_eq!(blocked.rejection(), Some(&Rejection::Recharging));
    assert_eq!(blocked.message(), "Cannot move while recharging");
    assert!(!engine.stop_rover().unwrap().is_success());

    let mut ticks = 0;
    while engine.world().unwrap().is_recharging {
        engine.tick().unwrap();
        ticks += 1;
        assert!(ticks <= 200, "recharge did not finish");
    }

    let status = engine.status_snapshot().unwrap();
    assert!(status.battery_level >= 80.0);
    assert!(status.communication_active);
    assert_eq!(status.status, RoverStatus::Idle);
    assert!(engine.move_rover("forward", None).unwrap().is_success());
}

#[test]
fn test_recharging_blocks_moves_with_comms_up() {
    let mut engine = engine();
    engine.world_mut().unwrap().battery_level = 9.8;
    engine.world_mut().unwrap().is_recharging = true;
    engine.world_mut().unwrap().communication_active = false;

    engine.tick().unwrap();
    let status = engine.status_snapshot().unwrap();
    assert!(status.communication_active);
    assert_eq!(status.status, RoverStatus::Recharging);

    let result = engine.move_rover("directional", Some(90)).unwrap();
    assert_eq!(result.message(), "Cannot move while recharging");

    match engine.get_sensor_data().unwrap() {
        SensorReport::Limited { message, .. } => {
            assert_eq!(message, "Rover in recharging mode, sensor readings limited")
        }
        other => panic!("expected limited report, got {:?}", other),
    }
}

#[test]
fn test_full_drain_from_idle() {
    let mut engine = engine();
    engine.world_mut().unwrap().battery_level = 10.02;

    let mut events = Vec::new();
    for _ in 0..1000 {
        events.extend(engine.tick().unwrap());
        if matches!(events.last(), Some(BatteryTransition::RechargeFinished { .. })) {
            break;
        }
    }

    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e {
            BatteryTransition::CommunicationLost { .. } => "lost",
            BatteryTransition::RechargeStarted { .. } => "recharge",
            BatteryTransition::CommunicationRestored { .. } => "restored",
            BatteryTransition::RechargeFinished { .. } => "finished",
        })
        .collect();
    assert_eq!(kinds, ["lost", "recharge", "restored", "finished"]);
}

#[test]
fn test_comm_loss_queries() {
    let mut engine = engine();
    engine.world_mut().unwrap().battery_level = 10.005;
    engine.tick().unwrap();

    let fleet = engine.get_fleet_status().unwrap();
    assert_eq!(fleet[0].status, RoverStatus::CommunicationLost);
    assert!(!fleet[0].communication_active);

    assert!(matches!(
        engine.get_sensor_data().unwrap(),
        SensorReport::CommunicationLost { .. }
    ));
    assert!(matches!(
        engine.get_disaster_data().unwrap(),
        DisasterReport::Error { .. }
    ));
    assert!(!engine.stop_rover().unwrap().is_success());
}

#[test]
fn test_status_query_advances_battery() {
    let mut engine = engine();

    let first = engine.get_rover_status().unwrap();
    let second = engine.get_rover_status().unwrap();

    assert_close(first.battery_level, 69.99);
    assert_close(second.battery_level, 69.98);
    assert_eq!(engine.status_snapshot().unwrap(), second);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let mut a = engine();
    let mut b = engine();

    assert_eq!(a.world().unwrap().survivors, b.world().unwrap().survivors);
    assert_eq!(
        a.get_sensor_data().unwrap().snapshot(),
        b.get_sensor_data().unwrap().snapshot()
    );
}

#[test]
fn test_wire_shapes() {
    let mut engine = engine();

    let status = serde_json::to_value(engine.get_rover_status().unwrap()).unwrap();
    assert_eq!(status["status"], "idle");
    assert_eq!(status["orientation"], 90);
    assert!(status["batteryLevel"].is_f64());
    assert_eq!(status["communicationActive"], true);

    let sensors = serde_json::to_value(engine.get_sensor_data().unwrap()).unwrap();
    assert_eq!(sensors["status"], "live");
    assert_eq!(sensors["lidar"].as_array().unwrap().len(), 24);

    let fleet = serde_json::to_value(engine.get_fleet_status().unwrap()).unwrap();
    assert_eq!(fleet[0]["name"], "Rescue Rover");
    assert_eq!(fleet[0]["isRecharging"], false);
}
