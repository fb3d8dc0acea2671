//! # doclone-kernel
//!
//! Clone registry and one-way document mirroring.
//!
//! A user registers a *clone*: a master document paired with a slave
//! document. Synchronizing a clone replaces the slave's body with a mirror
//! of the master's, copying the node kinds the slave can represent and
//! dropping the rest.
//!
//! - [`tree`] - node-level tree access and the in-memory [`DocTree`]
//! - [`store`] - document lifecycle (open, create, save) over memory or disk
//! - [`kv`] / [`db`] - per-user property storage for clone records
//! - [`registry`] - allocating, persisting, and listing clone records
//! - [`mirror`] - the full-replace synchronization walk
//! - [`kernel`] - [`Kernel`], tying a store and a registry together

pub mod config;
pub mod db;
pub mod error;
pub mod kernel;
pub mod kv;
pub mod mirror;
pub mod registry;
pub mod store;
pub mod tree;

pub use config::Config;
pub use db::SqliteKv;
pub use error::{DocloneError, DocloneResult};
pub use kernel::Kernel;
pub use kv::{KeyValueStore, MemoryKv};
pub use mirror::{CopyPolicy, SyncReport, copy_node, synchronize, synchronize_documents};
pub use registry::{CloneRegistry, DEFAULT_CLONE_SUFFIX};
pub use store::{Document, DocumentStore, LocalDocumentStore, MemoryDocumentStore};
pub use tree::{DocTree, DocumentTree, NodeId};
