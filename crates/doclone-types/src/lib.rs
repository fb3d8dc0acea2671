//! Shared document and clone types for doclone.
//!
//! This crate is the leaf of the workspace: typed identifiers, the closed set
//! of document node kinds, detached node values, and the clone records kept
//! by the registry. It has **no internal doclone dependencies**.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! Document (DocumentId)
//!     └── root section (NodeKind::BodySection)
//!         └── ordered children (Paragraph, Table, ListItem, ...)
//!             └── ordered children (Text, InlineImage, TableRow, ...)
//!
//! CloneRecord (CloneId)
//!     └── master: DocumentId  (authoritative source)
//!     └── slave:  DocumentId  (overwritten on every sync)
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`DocumentId`]    | Opaque document identifier                   |
//! | [`CloneId`]       | Registry key of one master/slave pair        |
//! | [`NodeKind`]      | Closed set of node type tags                 |
//! | [`Element`]       | Detached node value (kind + content + kids)  |
//! | [`CloneRecord`]   | Persisted master/slave association           |
//! | [`DocSummary`]    | `{id, name, url}` shown for ancestors etc.   |
//! |-------------------|----------------------------------------------|

pub mod clone;
pub mod element;
pub mod error;
pub mod ids;
pub mod kind;

// Re-export primary types at crate root for convenience.
pub use clone::{CloneListing, CloneRecord, DocSummary};
pub use element::{AttrValue, Attribute, Blob, Element, NodeContent};
pub use error::TypesError;
pub use ids::{CloneId, DocumentId};
pub use kind::NodeKind;
