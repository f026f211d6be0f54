//! Adapter process management.
//!
//! # Structure
//!
//! - `AdapterSupervisor` - Launch, kill and inspect the single adapter process
//! - `RingLogBuffer` - Bounded capture of the adapter's stdout and stderr
//! - Stream readers mirroring captured lines to the console and a log file

mod core;
mod logs;
mod state;
mod stream;

pub use core::{AdapterSupervisor, SupervisorConfig};
pub use logs::{DEFAULT_LOG_CAPACITY, LogLine, RingLogBuffer};
pub use stream::{ConsoleMirror, StreamKind};
