//! Error types.

use thiserror::Error;

/// Errors raised by the data-transfer shim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataTransferError {
    #[error("{field} value should be one of {allowed}, got {value:?}")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
}

/// Errors raised while loading or validating an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors reported by a [`Dom`](crate::Dom) host.
#[derive(Debug, Clone, Error)]
pub enum DomError {
    #[error("Failed to clone node: {0}")]
    Clone(String),
    #[error("Failed to insert node: {0}")]
    Insert(String),
    #[error("Document has no body")]
    NoBody,
    #[error("DOM error: {0}")]
    Other(String),
}

/// Result type for data-transfer operations.
pub type DataTransferResult<T> = Result<T, DataTransferError>;

/// Result type for host DOM operations.
pub type DomResult<T> = Result<T, DomError>;
