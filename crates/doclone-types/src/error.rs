//! Error types for parsing shared types.

use thiserror::Error;

/// Errors raised while parsing identifiers and records.
#[derive(Error, Debug)]
pub enum TypesError {
    /// Identifier is empty or contains characters unsafe for storage keys.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    /// Stored clone record could not be decoded.
    #[error("malformed clone record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}
