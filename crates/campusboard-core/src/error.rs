//! Core error types for campusboard-core.
//!
//! The scheduling engine itself never fails: malformed dates fall back to
//! today and policy rejections are silent no-ops. Errors only surface at the
//! edges where files are read or written (configuration and event catalogs).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for campusboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Event catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

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
    /// Home directory could not be resolved or created
    #[error("Cannot resolve configuration directory: {0}")]
    NoDataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Event catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File extension is neither `.json` nor `.toml`
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Catalog contents could not be parsed
    #[error("Failed to parse catalog: {0}")]
    ParseFailed(String),

    /// Two records share the same id
    #[error("Duplicate event id in catalog: {0}")]
    DuplicateId(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
