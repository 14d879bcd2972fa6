//! Operator-facing event log fed from engine snapshots

pub mod event_log;
pub mod monitor;

pub use event_log::{EventLog, LogCategory, LogEntry, MAX_LOG_ENTRIES};
pub use monitor::StatusMonitor;
