//! Configuration validation rules.
//!
//! - The toolbox executable must not be empty
//! - A timeout, if set, must be positive
//! - Parameter defaults must be finite and not negative

use crate::config::schema::DrainageConfig;
use crate::error::{DrainageError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending key.
    pub key: String,
    /// Human-readable error message.
    pub message: String,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &DrainageConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.toolbox.executable.trim().is_empty() {
        errors.push(ValidationError {
            key: "toolbox.executable".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if config.toolbox.timeout_secs == Some(0) {
        errors.push(ValidationError {
            key: "toolbox.timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    for (key, value) in [
        ("defaults.min_slope", config.defaults.min_slope),
        ("defaults.threshold", config.defaults.threshold),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                errors.push(ValidationError {
                    key: key.to_string(),
                    message: format!("must be a non-negative number, got {}", v),
                });
            }
        }
    }

    errors
}

/// Validate a configuration, failing on the first batch of errors.
pub fn validate(config: &DrainageConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| format!("{}: {}", e.key, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(DrainageError::ConfigValidationError { message })
}
