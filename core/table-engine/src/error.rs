//! FILENAME: core/table-engine/src/error.rs
//! Error types for the engine boundaries that can actually fail.

use thiserror::Error;

/// Failures at the OS clipboard boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard is not supported on this platform")]
    UnsupportedPlatform,
    #[error("clipboard is unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard access denied: {0}")]
    PermissionDenied(String),
    #[error("invalid clipboard payload: {0}")]
    InvalidPayload(String),
    #[error("clipboard operation failed: {0}")]
    OperationFailed(String),
}

/// Failures while loading an `EngineConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}
