//! Operator event log

use std::collections::VecDeque;

use serde::Serialize;

/// Maximum event log entries to keep
pub const MAX_LOG_ENTRIES: usize = 100;

/// An entry in the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Monotonic across the log's lifetime, survives eviction
    pub sequence: u64,
    pub message: String,
    pub category: LogCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Session,
    Battery,
    Communication,
    Survivor,
    Movement,
    System,
}

/// Bounded log; the oldest entry is evicted once full
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    next_sequence: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            next_sequence: 0,
        }
    }

    /// Add an entry, returning its sequence number
    pub fn log(&mut self, message: impl Into<String>, category: LogCategory) -> u64 {
        if self.entries.len() >= MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push_back(LogEntry {
            sequence,
            message: message.into(),
            category,
        });
        sequence
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries with a sequence number of at least `sequence`
    pub fn since(&self, sequence: u64) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.sequence >= sequence)
    }

    /// Sequence number the next entry will get
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
