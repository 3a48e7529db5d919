//! Core error types for fairhour-core.
//!
//! This module defines the error hierarchy using thiserror. Validation and
//! timezone errors fail fast; holiday-source failures never surface here
//! because the lookup service degrades to an empty result instead.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Core error type for fairhour-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Timezone resolution errors
    #[error("Timezone error: {0}")]
    Timezone(#[from] TimezoneError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Holiday cache storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Timezone-specific errors.
#[derive(Error, Debug)]
pub enum TimezoneError {
    /// The identifier is not a recognized IANA zone
    #[error("unrecognized timezone identifier '{0}'")]
    InvalidTimezone(String),

    /// Wall-clock time skipped by a DST spring-forward transition
    #[error("local time {naive} does not exist in zone '{zone}'")]
    InvalidLocalTime { zone: String, naive: NaiveDateTime },
}

/// Validation errors. Fail fast, never retried.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Country codes are ISO 3166-1 alpha-2
    #[error("invalid country code '{0}': expected exactly two ASCII letters")]
    InvalidCountryCode(String),

    /// Year outside the supported lookup range
    #[error("year {year} outside supported range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    /// Invalid field value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Holiday cache storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the cache database
    #[error("failed to open holiday cache at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Data directory could not be determined or created
    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
