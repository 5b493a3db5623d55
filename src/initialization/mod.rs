//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - HTTP client
//! - Archive base directory
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::path::Path;

use crate::error_handling::InitializationError;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Creates the archive base directory if needed.
///
/// # Errors
///
/// Returns `InitializationError::BaseDirError` if it cannot be created.
pub fn init_base_dir(path: &Path) -> Result<(), InitializationError> {
    std::fs::create_dir_all(path).map_err(|source| InitializationError::BaseDirError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_base_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("a").join("b");
        init_base_dir(&base).unwrap();
        assert!(base.is_dir());

        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        let err = init_base_dir(&file.join("sub")).unwrap_err();
        assert!(matches!(err, InitializationError::BaseDirError { .. }));
    }
}
