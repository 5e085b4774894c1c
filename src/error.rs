//! Error types.

use std::time::Duration;

use uuid::Uuid;

/// Errors from a catalog or estimate store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Estimate not found: {0}")]
    EstimateNotFound(Uuid),

    #[error("Line item not found: {0}")]
    LineItemNotFound(Uuid),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors from estimate editing operations.
///
/// Per-line failures inside a batch are not surfaced through this type; they
/// are collected in the batch report instead.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unknown line item: {0}")]
    UnknownLineItem(Uuid),

    #[error("Unknown area: {0}")]
    UnknownArea(Uuid),

    #[error("Unknown catalog material: {0}")]
    UnknownMaterial(String),

    #[error("Unknown version: {0}")]
    UnknownVersion(Uuid),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Could not record snapshot before {operation}: {source}")]
    SnapshotFailed {
        operation: String,
        #[source]
        source: StoreError,
    },
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, EditorError>;
