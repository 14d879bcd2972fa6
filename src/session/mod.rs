//! Session hosting: the engine plus a live battery ticker

pub mod runner;

pub use runner::SessionRunner;
