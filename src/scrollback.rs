//! Append-only scrollback.
//!
//! Every channel and the session itself own one [`LogStore`]. The dispatcher
//! appends from the network task while a renderer reads windows of it.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// What kind of line a log entry is; the renderer picks a style from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogKind {
    PrivMsg,
    System,
    Error,
    Status,
    Joined,
    Left,
}

/// One scrollback line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
    /// Who produced the line: a nick, the server host, or `System`.
    pub source: String,
    pub kind: LogKind,
    pub text: String,
}

/// Thread-safe ordered log.
#[derive(Debug, Default)]
pub struct LogStore {
    entries: Mutex<Vec<LogEntry>>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with the current time.
    pub fn append(&self, source: impl Into<String>, kind: LogKind, text: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            source: source.into(),
            kind,
            text: text.into(),
        };
        self.entries.lock().push(entry);
    }

    /// A window of at most `height` entries ending `offset` entries before
    /// the newest one, oldest first.
    ///
    /// An `offset` past the start of the history yields nothing.
    pub fn get_n_logs(&self, height: usize, offset: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock();
        let end = entries.len().saturating_sub(offset);
        let start = end.saturating_sub(height);
        entries[start..end].to_vec()
    }

    /// Snapshot of every entry.
    pub fn all(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
