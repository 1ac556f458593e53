//! Error types for the export pipeline.
//!
//! Library crates use [`PadExportError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all export operations.
#[derive(Debug, thiserror::Error)]
pub enum PadExportError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document root is neither a materialized node nor an ordered sequence.
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// Tree-to-node or node-to-markup conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// A media reference could not be turned into an inline representation.
    #[error("media error: {0}")]
    Media(String),

    /// Media resolution did not finish within the configured bound.
    #[error("media resolution timed out after {millis}ms")]
    Timeout { millis: u64 },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PadExportError>;

impl PadExportError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-input error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
