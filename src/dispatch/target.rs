//! Resolution of the external execution target

use crate::error::DispatchError;
use std::path::{Path, PathBuf};

/// A resolved path to the execution binary
///
/// Resolution only proves the file exists at dispatch-configuration time; a
/// target removed between resolve and spawn still surfaces as a spawn
/// failure with the sentinel exit code.
#[derive(Debug, Clone)]
pub struct ExecutionTarget {
    path: PathBuf,
}

impl ExecutionTarget {
    /// Check the configured path and wrap it, or fail with a resolution error
    pub fn resolve(path: impl Into<PathBuf>) -> Result<Self, DispatchError> {
        let path = path.into();
        if !path.is_file() {
            return Err(DispatchError::Resolution(path.display().to_string()));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
