//! Command-line arguments.

use clap::Parser;

/// Supervise the local adapter and serve one UI surface over stdin/stdout.
///
/// Commands are read from stdin as JSON lines; responses and notifications
/// are written to stdout. Diagnostics go to stderr.
#[derive(Debug, Parser)]
#[command(name = "lamgr")]
#[command(about = "Supervise the local adapter process")]
#[command(version)]
pub struct Cli {
    /// Enable debug output
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Default tracing directive when `RUST_LOG` is not set.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
