//! Document tree operations trait.

use std::fmt;

use doclone_types::{Element, NodeKind};

use crate::error::DocloneResult;

/// Node-level primitives over a rich-text document tree.
///
/// Reads take `&self` so a master tree can be walked without exclusive
/// access; structural writes take `&mut self`.
pub trait DocumentTree {
    /// Opaque node handle, valid until the node is cleared away.
    type NodeRef: Copy + fmt::Debug;

    // ========================================================================
    // Reading
    // ========================================================================

    /// Root container of the tree (the document body).
    fn root(&self) -> Self::NodeRef;

    /// Type tag of a node.
    fn kind(&self, node: Self::NodeRef) -> DocloneResult<NodeKind>;

    /// Children of a node, in document order.
    fn children(&self, node: Self::NodeRef) -> DocloneResult<Vec<Self::NodeRef>>;

    /// Copy of a node's own kind, content and attributes, without children.
    fn copy_shell(&self, node: Self::NodeRef) -> DocloneResult<Element>;

    /// Copy of a node and its whole subtree.
    fn copy_deep(&self, node: Self::NodeRef) -> DocloneResult<Element>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Remove every child of `node`.
    fn clear(&mut self, node: Self::NodeRef) -> DocloneResult<()>;

    /// Append `element` (and any children it carries) as the last child of
    /// `parent`, returning the handle of the new node.
    ///
    /// Fails with `DocloneError::Append` when the parent kind cannot hold
    /// the element, or the element's own subtree is malformed. Nothing is
    /// inserted on failure.
    fn append(&mut self, parent: Self::NodeRef, element: Element) -> DocloneResult<Self::NodeRef>;
}
