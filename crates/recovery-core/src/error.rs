//! Core error types for recovery-core.
//!
//! Most of the engine is total: an empty recommendation list or a quota
//! denial are ordinary results, not errors. The types here cover the few
//! places that can genuinely fail (user-supplied catalogs, ratings,
//! configuration, and persistence writes).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for recovery-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Routine catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence errors.
///
/// Only writes surface these; a failed read always degrades to the
/// default state.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDirUnavailable(String),

    /// Writing the state document failed
    #[error("Failed to write state to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Removing the state document failed
    #[error("Failed to clear state at {path}: {message}")]
    ClearFailed { path: PathBuf, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Routine catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog document could not be read
    #[error("Cannot read catalog at {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// The catalog document is not valid JSON for the routine schema
    #[error("Catalog parse failed: {0}")]
    ParseFailed(String),

    /// No routine with this id
    #[error("Unknown routine: {0}")]
    UnknownRoutine(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Rating outside the 0-10 scale
    #[error("Rating '{field}' must be between 0 and 10, got {value}")]
    RatingOutOfRange { field: String, value: i64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_render_with_context() {
        let err: CoreError = ValidationError::RatingOutOfRange {
            field: "after".into(),
            value: 11,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Validation error: Rating 'after' must be between 0 and 10, got 11"
        );

        let err: CoreError = CatalogError::UnknownRoutine("NOPE".into()).into();
        assert_eq!(err.to_string(), "Catalog error: Unknown routine: NOPE");
    }
}
