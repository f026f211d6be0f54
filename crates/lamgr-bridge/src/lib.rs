//! Bridge between UI surfaces and the adapter runtime.
//!
//! A surface talks to the manager over a [`MessageChannel`]: JSON envelopes
//! in, responses and notifications out. [`AdapterCommands`] is the handler
//! that maps commands onto the runtime.

#![deny(unsafe_code)]

pub mod channel;
pub mod commands;
pub mod handler;
pub mod transport;

pub use channel::MessageChannel;
pub use commands::AdapterCommands;
pub use handler::{HandlerError, MessageHandler};
pub use transport::{ChannelSink, encode_line, spawn_writer};
