//! Process runtime for the local adapter manager.
//!
//! Owns the adapter process and everything that acts on it over time:
//! output capture, serialized restarts, periodic log pushes, and
//! running-state change notifications.

#![deny(unsafe_code)]

mod guard;
pub mod process;
pub mod restart;
pub mod streamer;
#[cfg(test)]
mod testing;
pub mod watcher;

pub use process::{
    AdapterSupervisor, ConsoleMirror, DEFAULT_LOG_CAPACITY, LogLine, RingLogBuffer, StreamKind,
    SupervisorConfig,
};
pub use restart::{RestartCoordinator, RestartOutcome, RestartPolicy};
pub use streamer::{DEFAULT_STREAM_INTERVAL, LogStreamer, StreamOutcome};
pub use watcher::{DEFAULT_POLL_INTERVAL, relay_running_state, running_transitions};
