//! Core error types for focusflow-core.
//!
//! Only genuinely exceptional conditions surface here. Out-of-range durations
//! are clamped and notification/audio failures are swallowed by the effect
//! layer, so none of those ever become a `CoreError`.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::SessionKind;

/// Core error type for focusflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Timer command rejected
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Home directory could not be resolved
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Commands the timers refuse to carry out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Switching kind would silently discard a running session.
    #[error("cannot switch to {requested} while a {active} session is running")]
    KindLocked {
        requested: SessionKind,
        active: SessionKind,
    },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
