//! Core domain types and port definitions for the local adapter manager.
//!
//! This crate holds everything the runtime and the UI bridge agree on:
//! the message envelopes exchanged with a UI surface, the adapter lifecycle
//! vocabulary, the port traits, and path resolution. It contains no process
//! or transport implementation.

#![deny(unsafe_code)]

pub mod domain;
pub mod message;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{AdapterStatus, ProcessInfo};
pub use message::{CallbackId, MessageIn, MessageOut, names};
pub use paths::{
    ADAPTER_EXECUTABLE, ADAPTER_LOG_FILE, ADAPTER_PATH_ENV, ADAPTER_SUBDIR, PathError,
    adapter_executable_in, install_dir, resolve_adapter_path,
};
pub use ports::{AdapterControl, ChannelError, HostError, MessageSink, ProcessError, WindowHost};
