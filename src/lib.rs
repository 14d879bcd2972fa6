//! Rescue Rover - search-and-rescue rover simulation

pub mod command;
pub mod core;
pub mod session;
pub mod simulation;
pub mod ui;
pub mod world;
