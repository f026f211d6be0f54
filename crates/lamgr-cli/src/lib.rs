//! Terminal host for the local adapter manager.
//!
//! One process supervises the adapter and serves a single UI surface over
//! stdin/stdout using newline-delimited JSON messages.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod host;
pub mod parser;

pub use bootstrap::{AppContext, CliConfig, bootstrap, serve};
pub use host::TerminalLogView;
pub use parser::Cli;
