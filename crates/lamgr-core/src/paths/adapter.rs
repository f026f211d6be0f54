//! Adapter executable resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the adapter executable path.
pub const ADAPTER_PATH_ENV: &str = "LAMGR_ADAPTER_PATH";

/// Sub-directory of the install directory holding the adapter.
pub const ADAPTER_SUBDIR: &str = "adapter";

/// File name of the adapter executable.
#[cfg(target_os = "windows")]
pub const ADAPTER_EXECUTABLE: &str = "LocalAdapter.exe";

/// File name of the adapter executable.
#[cfg(not(target_os = "windows"))]
pub const ADAPTER_EXECUTABLE: &str = "LocalAdapter";

/// Durable log file, opened in append mode relative to the working directory.
pub const ADAPTER_LOG_FILE: &str = "LocalAdapter.log";

/// Directory containing the running binary.
pub fn install_dir() -> Result<PathBuf, PathError> {
    let exe = env::current_exe().map_err(|e| PathError::CurrentExe(e.to_string()))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or(PathError::NoInstallDir)
}

/// Adapter executable below a given install directory.
pub fn adapter_executable_in(install_dir: &Path) -> PathBuf {
    install_dir.join(ADAPTER_SUBDIR).join(ADAPTER_EXECUTABLE)
}

/// Resolve the adapter executable.
///
/// Resolution order:
/// 1. `LAMGR_ADAPTER_PATH` environment variable (if set and non-empty)
/// 2. `<install dir>/adapter/LocalAdapter[.exe]`
pub fn resolve_adapter_path() -> Result<PathBuf, PathError> {
    if let Some(path) = env::var_os(ADAPTER_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(adapter_executable_in(&install_dir()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_executable_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = adapter_executable_in(dir.path());
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with(Path::new(ADAPTER_SUBDIR).join(ADAPTER_EXECUTABLE)));
    }

    #[test]
    fn test_install_dir_contains_test_binary() {
        let dir = install_dir().unwrap();
        let exe = env::current_exe().unwrap();
        assert_eq!(exe.parent().unwrap(), dir);
    }

    #[test]
    fn test_resolve_adapter_path() {
        // Either the override or the install-relative default; never an empty path
        let path = resolve_adapter_path().unwrap();
        assert!(!path.as_os_str().is_empty());
        if env::var_os(ADAPTER_PATH_ENV).is_none() {
            assert!(path.ends_with(ADAPTER_EXECUTABLE));
        }
    }
}
