//! Error types for the execution crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for fallible local file operations.
pub type Result<T> = std::result::Result<T, ExecError>;

/// Failures of the local file collaborator.
///
/// These never reach the engine as errors: [`crate::FileOperations`] reports
/// a plain success flag and the detail is logged.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path has no file name: {}", .0.display())]
    MissingFileName(PathBuf),

    #[error("source does not exist: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("background file task failed: {0}")]
    TaskJoin(String),
}

impl ExecError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
