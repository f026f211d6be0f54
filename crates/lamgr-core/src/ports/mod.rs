//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` types in any signature
//! - Intent-based methods for adapter control (start, stop, inspect)
//! - Sinks and hosts are synchronous and must not block

pub mod adapter_control;
pub mod message_sink;
pub mod window_host;

use thiserror::Error;

use crate::domain::AdapterStatus;

pub use adapter_control::AdapterControl;
pub use message_sink::MessageSink;
pub use window_host::WindowHost;

/// Domain-specific errors for adapter process operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be launched.
    #[error("Failed to start {path}: {reason}")]
    SpawnFailed { path: String, reason: String },

    /// A start was requested while a process is starting or live.
    #[error("Adapter is already {0}")]
    AlreadyActive(AdapterStatus),

    /// The termination signal could not be delivered.
    #[error("Failed to kill adapter (pid {pid}): {reason}")]
    KillFailed { pid: u32, reason: String },

    /// Internal process error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors on the duplex message transport.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The surface on the other end is gone.
    #[error("Channel closed")]
    Closed,

    /// An inbound line was not a valid envelope.
    #[error("Malformed message: {0}")]
    Malformed(String),

    /// An outbound envelope could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reading from or writing to the transport failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ChannelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Errors raised by the window host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to open log view: {0}")]
    LogView(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_display() {
        let err = ProcessError::SpawnFailed {
            path: "/opt/la/LocalAdapter".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to start /opt/la/LocalAdapter: No such file or directory"
        );
    }

    #[test]
    fn test_already_active_names_status() {
        let err = ProcessError::AlreadyActive(AdapterStatus::Starting);
        assert_eq!(err.to_string(), "Adapter is already starting");
    }

    #[test]
    fn test_channel_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ChannelError = io.into();
        assert!(matches!(err, ChannelError::Io(ref msg) if msg.contains("pipe closed")));
    }
}
