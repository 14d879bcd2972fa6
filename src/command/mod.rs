//! Operator command input
//!
//! Console text -> ConsoleCommand -> MoveCommand / engine query

pub mod parser;

pub use crate::simulation::movement::MoveCommand;
pub use parser::{parse_input, ConsoleCommand};
