//! Document store backends.
//!
//! Backends implement [`DocumentStore`](super::DocumentStore) for different
//! storage types.

mod local;
mod memory;

pub use local::LocalDocumentStore;
pub use memory::MemoryDocumentStore;
