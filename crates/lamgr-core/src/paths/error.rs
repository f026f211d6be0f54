//! Path-related error types.

use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// The running binary's location is unknown.
    #[error("Cannot determine current executable: {0}")]
    CurrentExe(String),

    /// The running binary has no parent directory.
    #[error("Executable path has no parent directory")]
    NoInstallDir,
}
