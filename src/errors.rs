//! Transfer error types

use thiserror::Error;

use crate::storage::StorageError;

/// Structural problems that stop an export or import before it starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No pages selected")]
    NoSelection,

    #[error("Invalid package format: missing version")]
    MissingVersion,

    #[error("Invalid package format: {0}")]
    Malformed(String),
}

/// Errors returned by whole transfer operations.
///
/// Per-item failures (unreachable media, rejected writes) never show up
/// here; they are collected into the import report instead.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;
