//! Error types for drainage operations.
//!
//! This module defines [`DrainageError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `DrainageError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `DrainageError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for drainage operations.
#[derive(Debug, Error)]
pub enum DrainageError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A parameter value does not satisfy the algorithm schema.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// The input DEM does not exist.
    #[error("Input layer not found: {path}")]
    MissingInput { path: PathBuf },

    /// The toolbox was asked for an algorithm it does not know.
    #[error("Unknown tool: {id}")]
    UnknownTool { id: String },

    /// The toolbox executable could not be started.
    #[error("Toolbox executable not found: {executable}")]
    ToolNotFound { executable: String },

    /// A delegated tool exited unsuccessfully.
    #[error("Tool '{tool}' failed with exit code {code:?}: {message}")]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        message: String,
    },

    /// A delegated tool ran longer than the configured timeout.
    #[error("Tool '{tool}' timed out after {seconds}s")]
    ToolTimedOut { tool: String, seconds: u64 },

    /// A delegated tool reported success but did not write a declared output.
    #[error("Tool '{tool}' did not produce output {output} at {path}")]
    MissingOutput {
        tool: String,
        output: String,
        path: PathBuf,
    },

    /// The run was cancelled while a tool was executing.
    #[error("Cancelled")]
    Canceled,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrainageError {
    /// Shorthand for [`DrainageError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error stems from bad user input rather than a failed run.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. }
                | Self::MissingInput { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigValidationError { .. }
                | Self::ConfigParseError { .. }
        )
    }
}

/// Result type alias for drainage operations.
pub type Result<T> = std::result::Result<T, DrainageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = DrainageError::ConfigNotFound {
            path: PathBuf::from("/foo/config.yml"),
        };
        assert!(err.to_string().contains("/foo/config.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = DrainageError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn invalid_parameter_displays_name_and_message() {
        let err = DrainageError::invalid_parameter("MINSLOPE", "must not be negative");
        let msg = err.to_string();
        assert!(msg.contains("MINSLOPE"));
        assert!(msg.contains("must not be negative"));
    }

    #[test]
    fn tool_failed_displays_tool_and_code() {
        let err = DrainageError::ToolFailed {
            tool: "saga:catchmentarea".into(),
            code: Some(3),
            message: "grid system mismatch".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("saga:catchmentarea"));
        assert!(msg.contains("3"));
        assert!(msg.contains("grid system mismatch"));
    }

    #[test]
    fn missing_output_displays_path() {
        let err = DrainageError::MissingOutput {
            tool: "saga:channelnetwork".into(),
            output: "SHAPES".into(),
            path: PathBuf::from("/tmp/channels.shp"),
        };
        let msg = err.to_string();
        assert!(msg.contains("SHAPES"));
        assert!(msg.contains("/tmp/channels.shp"));
    }

    #[test]
    fn usage_errors_are_classified() {
        assert!(DrainageError::invalid_parameter("INPUT", "required").is_usage_error());
        assert!(DrainageError::MissingInput {
            path: PathBuf::from("dem.tif")
        }
        .is_usage_error());
        assert!(DrainageError::ConfigNotFound {
            path: PathBuf::from("missing.yml")
        }
        .is_usage_error());
        assert!(!DrainageError::Canceled.is_usage_error());
        assert!(!DrainageError::UnknownTool { id: "x".into() }.is_usage_error());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: DrainageError = io_err.into();
        assert!(matches!(err, DrainageError::Io(_)));
    }
}
