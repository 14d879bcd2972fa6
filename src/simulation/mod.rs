pub mod battery;
pub mod detection;
pub mod engine;
pub mod movement;
pub mod sensors;

pub use battery::BatteryTransition;
pub use engine::{DisasterReport, FleetEntry, SimulationEngine, StatusSnapshot};
pub use movement::{CommandResult, MoveCommand, Rejection};
pub use sensors::SensorReport;
