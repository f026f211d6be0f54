//! Adapter lifecycle vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lifecycle status of the supervised adapter process.
///
/// `Crashed` is reached when the process exits without a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterStatus {
    Stopped,
    Starting,
    Running,
    Stopping,
    Crashed,
}

impl AdapterStatus {
    /// Whether no process is starting or live, so a new one may be launched.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Stopped | Self::Crashed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Crashed => "crashed",
        }
    }
}

impl std::fmt::Display for AdapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of one adapter run.
///
/// A new value is produced on every start; it is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    /// OS process identifier.
    pub pid: u32,
    /// Path the process was launched from.
    pub executable: PathBuf,
    /// When the process was confirmed launched.
    pub started_at: DateTime<Utc>,
}

impl ProcessInfo {
    pub fn new(pid: u32, executable: PathBuf) -> Self {
        Self {
            pid,
            executable,
            started_at: Utc::now(),
        }
    }
}
