//! Error type for the development tools.

use tactics_core::error::GameError;
use thiserror::Error;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised by tool commands.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to read or write a file.
    #[error("Failed to access '{path}': {source}")]
    Io {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A rules operation failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Failed to render a JSON report.
    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

impl ToolError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
