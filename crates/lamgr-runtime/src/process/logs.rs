//! Bounded in-memory capture of adapter output.
//!
//! Lines are stored as raw bytes and decoded lossily only when a snapshot
//! is taken. Writers (the stdout and stderr readers) are serialized by the
//! write lock; any number of snapshot readers may run concurrently.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

/// Maximum number of log lines kept by default
pub const DEFAULT_LOG_CAPACITY: usize = 96;

/// One captured line of output, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine(Box<[u8]>);

impl LogLine {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into().into_boxed_slice())
    }

    /// Decode as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for LogLine {
    fn from(line: &str) -> Self {
        Self::new(line.as_bytes())
    }
}

/// Fixed-capacity, thread-safe ring of captured lines.
#[derive(Debug)]
pub struct RingLogBuffer {
    lines: RwLock<VecDeque<LogLine>>,
    capacity: usize,
}

impl RingLogBuffer {
    /// Create an empty buffer holding at most `capacity` lines (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a line, evicting the oldest one if the buffer is full.
    pub fn append(&self, line: LogLine) {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        if lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Independent copy of all lines, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        let lines = self.lines.read().unwrap_or_else(PoisonError::into_inner);
        lines.iter().map(LogLine::to_string_lossy).collect()
    }

    pub fn len(&self) -> usize {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RingLogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
