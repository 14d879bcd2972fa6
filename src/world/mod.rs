//! World model: rover state, obstacles and survivors

pub mod obstacle;
pub mod state;
pub mod survivor;

pub use obstacle::{is_position_valid, Obstacle};
pub use state::{
    Disaster, LidarReading, Motion, ProximityReading, RoverStatus, SensorSnapshot, WorldState,
};
pub use survivor::{generate_survivors, Survivor, SurvivorStatus, VitalSigns};
