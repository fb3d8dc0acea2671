//! Document store abstraction.
//!
//! This module is the host side of synchronization: opening documents by
//! id, creating blank ones, and persisting them again.
//!
//! - [`DocumentStore`] - Core trait for document lifecycle operations
//! - [`MemoryDocumentStore`] - In-memory documents (testing, embedding)
//! - [`LocalDocumentStore`] - One JSON file per document in a directory
//!
//! ## Design Decisions
//!
//! - **Working copies**: `open` hands out an owned [`Document`]; nothing
//!   reaches the store until `save_and_close`.
//! - **Metadata reads**: `describe` defaults to an open + save-and-close
//!   round trip. Backends override it with a read-only metadata fetch.

pub mod backends;
mod ops;

pub use backends::{LocalDocumentStore, MemoryDocumentStore};
pub use ops::{Document, DocumentStore};
