//! Console-style session log with the severity tags the status panel
//! shows, mirrored to the `log` crate for normal capture. Bounded.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
            Severity::Success => "SUCCESS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Offset from session start.
    pub at: Duration,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug)]
pub struct EventLog {
    started: Instant,
    entries: VecDeque<LogEntry>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
            // `log` has no success level; keep the tag in the entry only.
            Severity::Info | Severity::Success => log::info!("{message}"),
        }

        self.entries.push_back(LogEntry {
            at: self.started.elapsed(),
            severity,
            message,
        });
        if self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.push(Severity::Info, "Logs cleared.");
    }
}
