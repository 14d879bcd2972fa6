//! Parse operator console input into commands
//!
//! Keys follow the dashboard layout: w = north (0°), d = east (90°),
//! s = south (180°), a = west (270°).

use crate::simulation::movement::MoveCommand;

/// A console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Move(MoveCommand),
    Stop,
    /// Start (or restart) the session
    Start,
    /// End the session
    End,
    Status,
    Sensors,
    Fleet,
    Disasters,
    /// Print the event log
    Log,
    /// Run battery ticks by hand
    Tick(u64),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse one line of console input. Case-insensitive.
pub fn parse_input(line: &str) -> ConsoleCommand {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();

    let Some(head) = words.next() else {
        return ConsoleCommand::Empty;
    };
    let arg = words.next();
    if words.next().is_some() {
        return ConsoleCommand::Unknown(line);
    }

    match (head, arg) {
        ("w" | "north", None) => ConsoleCommand::Move(MoveCommand::Directional(0)),
        ("d" | "east", None) => ConsoleCommand::Move(MoveCommand::Directional(90)),
        ("s" | "south", None) => ConsoleCommand::Move(MoveCommand::Directional(180)),
        ("a" | "west", None) => ConsoleCommand::Move(MoveCommand::Directional(270)),
        ("forward", None) => ConsoleCommand::Move(MoveCommand::Forward),
        ("backward", None) => ConsoleCommand::Move(MoveCommand::Backward),
        ("left", None) => ConsoleCommand::Move(MoveCommand::Left),
        ("right", None) => ConsoleCommand::Move(MoveCommand::Right),
        ("heading", Some(deg)) => match deg.parse::<i32>() {
            Ok(deg) => ConsoleCommand::Move(MoveCommand::Directional(deg)),
            Err(_) => ConsoleCommand::Unknown(line.clone()),
        },
        ("stop" | "halt" | "x", None) => ConsoleCommand::Stop,
        ("start", None) => ConsoleCommand::Start,
        ("end", None) => ConsoleCommand::End,
        ("status", None) => ConsoleCommand::Status,
        ("sensors", None) => ConsoleCommand::Sensors,
        ("fleet", None) => ConsoleCommand::Fleet,
        ("disasters", None) => ConsoleCommand::Disasters,
        ("log", None) => ConsoleCommand::Log,
        ("tick", None) => ConsoleCommand::Tick(1),
        ("tick", Some(n)) => match n.parse::<u64>() {
            Ok(n) => ConsoleCommand::Tick(n),
            Err(_) => ConsoleCommand::Unknown(line.clone()),
        },
        ("help" | "?", None) => ConsoleCommand::Help,
        ("quit" | "q", None) => ConsoleCommand::Quit,
        _ => ConsoleCommand::Unknown(line.clone()),
    }
}
