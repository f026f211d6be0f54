//! Path utilities for the adapter executable and its durable log.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - The executable lives at a fixed location below the install directory
//! - An environment variable can point at a different executable

mod adapter;
mod error;

pub use adapter::{
    ADAPTER_EXECUTABLE, ADAPTER_LOG_FILE, ADAPTER_PATH_ENV, ADAPTER_SUBDIR, adapter_executable_in,
    install_dir, resolve_adapter_path,
};
pub use error::PathError;
