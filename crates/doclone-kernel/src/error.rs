//! Kernel error types.

use std::io;

use doclone_types::{NodeKind, TypesError};
use thiserror::Error;

/// Kernel error type.
///
/// Mirrors the host's failure modes: documents that cannot be opened
/// (`Access`), created (`Creation`), or structurally written (`Append`), and
/// registry entries pointing at documents that are gone (`NotFound`).
#[derive(Debug, Error)]
pub enum DocloneError {
    /// Referenced document cannot be opened or resolved.
    #[error("cannot access document: {0}")]
    Access(String),

    /// Destination document cannot be created.
    #[error("cannot create document: {0}")]
    Creation(String),

    /// Destination tree rejected a structural operation.
    #[error("cannot append {child} under {parent}")]
    Append { parent: NodeKind, child: NodeKind },

    /// Registry or tree references something that no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// Node handle does not belong to this tree (stale or foreign).
    #[error("invalid node: {0}")]
    InvalidNode(String),

    /// Stored clone record is malformed.
    #[error("bad clone record: {0}")]
    Record(#[from] TypesError),

    /// Key-value backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl DocloneError {
    /// Create an Access error.
    pub fn access(msg: impl Into<String>) -> Self {
        Self::Access(msg.into())
    }

    /// Create a Creation error.
    pub fn creation(msg: impl Into<String>) -> Self {
        Self::Creation(msg.into())
    }

    /// Create an Append error.
    pub fn append(parent: NodeKind, child: NodeKind) -> Self {
        Self::Append { parent, child }
    }

    /// Create a NotFound error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an InvalidNode error.
    pub fn invalid_node(msg: impl Into<String>) -> Self {
        Self::InvalidNode(msg.into())
    }

    /// Create a Storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Kernel result type.
pub type DocloneResult<T> = Result<T, DocloneError>;
