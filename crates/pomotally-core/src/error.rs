//! Core error types for pomotally-core.
//!
//! This module defines a layered error hierarchy using thiserror. Each
//! subsystem has its own enum; `CoreError` aggregates them at the API
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotally-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session-store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Side-channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session-store errors.
///
/// `Init` is fatal: callers must surface it and refuse to run. `Write`
/// and `Read` are recoverable per operation, and `Export` never blocks
/// the primary store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create or open the store; the application cannot run
    #[error("Failed to open session store at {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A counter update failed; the session is not durably recorded
    #[error("Failed to write session record: {0}")]
    Write(#[source] rusqlite::Error),

    /// A counter read failed
    #[error("Failed to read session records: {0}")]
    Read(#[source] rusqlite::Error),

    /// The export artifact could not be updated
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Errors while producing the denormalized export artifact.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem failure while writing or replacing the artifact
    #[error("Export IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failed
    #[error("Export CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An existing export row could not be parsed
    #[error("Malformed export row: {0}")]
    MalformedRow(String),
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

    /// Key does not name a known configuration field
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Side-channel (notification / habit-log) errors.
///
/// These never propagate into timer or storage control flow; dispatchers
/// log them and move on.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Credentials are missing for the service
    #[error("Channel '{service}' is not configured")]
    NotConfigured { service: String },

    /// Transport-level failure
    #[error("Channel request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Channel '{service}' rejected the request ({status}): {body}")]
    Rejected {
        service: String,
        status: u16,
        body: String,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
