//! Sensor simulation: environment, proximity and LIDAR sweeps
//!
//! Readings are generated from the rover position against the fixed obstacle
//! field. Ray angles are measured from the +x axis, matching the heading
//! convention used for movement. Environmental values are independent uniform
//! draws on every sweep.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::types::Vec2;
use crate::world::obstacle::Obstacle;
use crate::world::state::{LidarReading, ProximityReading, SensorSnapshot};

/// Uniform ranges for the environmental channels
const TEMPERATURE_C: std::ops::Range<f64> = 20.0..25.0;
const HUMIDITY_PCT: std::ops::Range<f64> = 40.0..50.0;
const PRESSURE_HPA: std::ops::Range<f64> = 1010.0..1020.0;
const RADIATION_MSV: std::ops::Range<f64> = 0.1..0.2;

/// What `get_sensor_data` hands back
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SensorReport {
    /// Fresh sweep
    Live {
        #[serde(flatten)]
        snapshot: SensorSnapshot,
    },
    /// Cached readings returned while recharging
    Limited {
        message: String,
        #[serde(flatten)]
        snapshot: SensorSnapshot,
    },
    /// Rover unreachable; environmental fields are cleared
    #[serde(rename = "error")]
    CommunicationLost {
        message: String,
        #[serde(rename = "lastKnownData")]
        last_known: SensorSnapshot,
    },
}

impl SensorReport {
    pub fn snapshot(&self) -> &SensorSnapshot {
        match self {
            SensorReport::Live { snapshot } | SensorReport::Limited { snapshot, .. } => snapshot,
            SensorReport::CommunicationLost { last_known, .. } => last_known,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SensorReport::Live { .. })
    }
}

/// Fill the environmental channels with fresh draws
pub fn sample_environment<R: Rng + ?Sized>(snapshot: &mut SensorSnapshot, rng: &mut R) {
    snapshot.temperature = Some(rng.gen_range(TEMPERATURE_C));
    snapshot.humidity = Some(rng.gen_range(HUMIDITY_PCT));
    snapshot.pressure = Some(rng.gen_range(PRESSURE_HPA));
    snapshot.radiation = Some(rng.gen_range(RADIATION_MSV));
}

/// One reading per obstacle whose center is within proximity range
pub fn proximity_sweep(
    position: Vec2,
    obstacles: &[Obstacle],
    config: &SimulationConfig,
) -> Vec<ProximityReading> {
    obstacles
        .iter()
        .filter_map(|obstacle| {
            let center = obstacle.center();
            let distance = position.distance(&center);
            if distance < config.proximity_range {
                Some(ProximityReading {
                    angle: position.bearing_to(&center).to_degrees(),
                    distance,
                    intensity: 1.0 - distance / config.proximity_range,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Smallest absolute difference between two angles, in [0, π]
fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(TAU);
    diff.min(TAU - diff)
}

/// Fixed-ray LIDAR sweep with uniform range noise
///
/// Each ray returns the distance to the nearest obstacle center whose bearing
/// is within the angular tolerance of the ray, or max range otherwise.
pub fn lidar_sweep<R: Rng + ?Sized>(
    position: Vec2,
    obstacles: &[Obstacle],
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<LidarReading> {
    let step = 360.0 / config.lidar_rays as f64;

    (0..config.lidar_rays)
        .map(|i| {
            let angle = i as f64 * step;
            let ray = angle * PI / 180.0;

            let distance = obstacles
                .iter()
                .filter(|o| {
                    angular_difference(ray, position.bearing_to(&o.center()))
                        < config.lidar_angular_tolerance
                })
                .map(|o| position.distance(&o.center()))
                .fold(config.lidar_max_range, f64::min);

            let noise = if config.lidar_noise > 0.0 {
                rng.gen_range(0.0..config.lidar_noise)
            } else {
                0.0
            };

            LidarReading {
                angle,
                distance: distance + noise,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_environment_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut snapshot = SensorSnapshot::default();
        for _ in 0..100 {
            sample_environment(&mut snapshot, &mut rng);
            assert!(TEMPERATURE_C.contains(&snapshot.temperature.unwrap()));
            assert!(HUMIDITY_PCT.contains(&snapshot.humidity.unwrap()));
            assert!(PRESSURE_HPA.contains(&snapshot.pressure.unwrap()));
            assert!(RADIATION_MSV.contains(&snapshot.radiation.unwrap()));
        }
    }

    #[test]
    fn test_proximity_from_start_position() {
        let config = SimulationConfig::default();
        let readings = proximity_sweep(Vec2::new(10.0, 10.0), &config.obstacles, &config);

        // (15,15) at ~7.07 and (5,20) at ~11.18 / (25,5) at ~15.8
        assert_eq!(readings.len(), 1);
        let r = readings[0];
        assert!((r.distance - 50f64.sqrt()).abs() < 1e-9);
        assert!((r.angle - 45.0).abs() < 1e-9);
        assert!((r.intensity - (1.0 - 50f64.sqrt() / 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_lidar_ray_count_and_range() {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let sweep = lidar_sweep(Vec2::new(10.0, 10.0), &config.obstacles, &config, &mut rng);

        assert_eq!(sweep.len(), 24);
        assert_eq!(sweep[1].angle, 15.0);
        for reading in &sweep {
            assert!(reading.distance < config.lidar_max_range + config.lidar_noise);
        }

        // Ray at 45° points straight at the (15,15) obstacle
        let hit = sweep[3].distance;
        assert!(hit >= 50f64.sqrt() && hit < 50f64.sqrt() + 0.5);
        // Ray at 0° sees nothing
        assert!(sweep[0].distance >= 20.0);
    }

    #[test]
    fn test_lidar_wraps_across_zero() {
        let config = SimulationConfig {
            lidar_noise: 0.0,
            ..SimulationConfig::default()
        };
        // Obstacle just below the +x axis: bearing ≈ -0.1 rad, close to the 0° ray
        let obstacles = [Obstacle::new(10.0, -1.0, 0.5)];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let sweep = lidar_sweep(Vec2::new(0.0, 0.0), &obstacles, &config, &mut rng);

        assert!((sweep[0].distance - 101f64.sqrt()).abs() < 1e-9);
        // The 180° ray must not see it
        assert_eq!(sweep[12].distance, 20.0);
    }

    #[test]
    fn test_angular_difference_wraps() {
        assert!((angular_difference(6.2, -0.05) - (6.25 - TAU).abs()).abs() < 1e-9);
        assert!((angular_difference(0.0, PI) - PI).abs() < 1e-9);
        assert!(angular_difference(1.0, 1.0) < 1e-12);
    }

    #[test]
    fn test_comm_lost_report_wire_shape() {
        let report = SensorReport::CommunicationLost {
            message: "Communication lost with rover".into(),
            last_known: SensorSnapshot::default(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["lastKnownData"]["temperature"].is_null());
    }
}
