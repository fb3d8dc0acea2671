//! Document tree abstraction.
//!
//! - [`DocumentTree`] - node-level read/write primitives the mirror engine walks
//! - [`DocTree`] - arena-backed in-memory tree used by the bundled stores
//!
//! ## Design Decisions
//!
//! - **Handles, not references**: nodes are addressed by small `Copy`
//!   handles so a walker can hold positions in two trees at once.
//! - **Detached values across trees**: copies come out as [`Element`]
//!   values and go back in through `append`, so source and destination
//!   never share storage.
//! - **Nesting enforced on append**: a tree rejects children its parent
//!   kind cannot hold, surfacing as `DocloneError::Append`.
//!
//! [`Element`]: doclone_types::Element

mod arena;
mod ops;

pub use arena::{DocTree, NodeId};
pub use ops::DocumentTree;
