//! Error types for cinfinder.
//!
//! Library crates use [`CinFinderError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! A company that cannot be located is not an error: the registry pipeline
//! reports it as a normal outcome so callers can answer "absent" rather
//! than "failed".

use std::path::PathBuf;

/// Top-level error type for all cinfinder operations.
#[derive(Debug, thiserror::Error)]
pub enum CinFinderError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Connection failure or non-2xx status from an outbound request.
    #[error("network error: {0}")]
    Network(String),

    /// Name search failed as a whole; no partial results are kept.
    #[error("search failed: {0}")]
    Search(String),

    /// A profile page was fetched but holds no `Organization` structured data.
    #[error("extraction failed: {message}")]
    Extraction { message: String },

    /// An upstream body could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A configured value cannot be used to build a request.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CinFinderError>;

impl CinFinderError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an extraction error from any displayable message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
