//! Error types for wikimill.
//!
//! Library crates use [`WikimillError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all wikimill operations.
#[derive(Debug, thiserror::Error)]
pub enum WikimillError {
    /// Configuration loading or validation error (bad corpus version,
    /// bad output kind, malformed config file).
    #[error("config error: {message}")]
    Config { message: String },

    /// A required external tool is not installed.
    #[error("missing prerequisite: {tool} not found on PATH")]
    Prerequisite { tool: String },

    /// One file's conversion step failed (external converter, read, or write).
    /// Always recovered at the batch level and counted, never propagated.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Concatenation or metadata extraction could not read an expected
    /// IR file. Surfaced as a run-level failure: downstream output would
    /// be incomplete or misleading otherwise.
    #[error("aggregation error: {message}")]
    Aggregation { message: String },

    /// An external subprocess (git, pandoc) exited unsuccessfully.
    #[error("command `{command}` failed: {detail}")]
    Subprocess { command: String, detail: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WikimillError>;

impl WikimillError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an aggregation error from any displayable message.
    pub fn aggregation(msg: impl Into<String>) -> Self {
        Self::Aggregation {
            message: msg.into(),
        }
    }

    /// Create a subprocess error for a failed external command.
    pub fn subprocess(command: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Subprocess {
            command: command.into(),
            detail: detail.into(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = WikimillError::config("invalid corpus version: 5");
        assert_eq!(err.to_string(), "config error: invalid corpus version: 5");

        let err = WikimillError::Prerequisite {
            tool: "pandoc".into(),
        };
        assert!(err.to_string().contains("pandoc"));

        let err = WikimillError::aggregation("IR tree is empty");
        assert!(err.to_string().contains("IR tree is empty"));
    }
}
