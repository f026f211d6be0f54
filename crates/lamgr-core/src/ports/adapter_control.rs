//! Adapter control port.
//!
//! This port is what the restart coordinator, the log streamer and the
//! command handler act on. The runtime's `AdapterSupervisor` is the
//! production implementation.

use async_trait::async_trait;

use super::ProcessError;
use crate::domain::{AdapterStatus, ProcessInfo};

/// Lifecycle control and inspection of the single adapter process.
///
/// Implementations must be thread-safe. `is_running` and `get_log` are
/// called from polling loops and must never block on `start`/`stop`.
#[async_trait]
pub trait AdapterControl: Send + Sync {
    /// Launch a new adapter process and return its PID.
    async fn start(&self) -> Result<u32, ProcessError>;

    /// Forcefully terminate the current process.
    ///
    /// Succeeds as a no-op when there is nothing to stop.
    async fn stop(&self) -> Result<(), ProcessError>;

    /// Liveness flag. Never blocks.
    fn is_running(&self) -> bool;

    /// Snapshot of captured output, oldest line first.
    fn get_log(&self) -> Vec<String>;

    /// Current lifecycle status.
    fn status(&self) -> AdapterStatus;

    /// The current (or last) run, if any process was ever launched.
    fn process_info(&self) -> Option<ProcessInfo>;
}
