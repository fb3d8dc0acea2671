//! Arena-backed in-memory document tree.

use doclone_types::{Element, NodeKind};

use crate::error::{DocloneError, DocloneResult};
use crate::tree::ops::DocumentTree;

/// Handle to a node in a [`DocTree`].
///
/// Carries the arena epoch it was issued in, so handles from before the
/// root was cleared are rejected instead of aliasing newer nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    epoch: u32,
}

impl NodeId {
    const ROOT: NodeId = NodeId { index: 0, epoch: 0 };
}

#[derive(Debug, Clone)]
struct Slot {
    /// The node itself; its `children` stay empty.
    node: Element,
    children: Vec<NodeId>,
    epoch: u32,
    live: bool,
}

impl Slot {
    fn from_element(mut element: Element, epoch: u32) -> (Self, Vec<Element>) {
        let children = std::mem::take(&mut element.children);
        let slot = Self {
            node: element,
            children: Vec::new(),
            epoch,
            live: true,
        };
        (slot, children)
    }
}

/// In-memory document tree.
///
/// Slot 0 is the root and lives as long as the tree. Clearing the root
/// drops the whole arena behind it; clearing any other node only marks its
/// descendants dead.
#[derive(Debug, Clone)]
pub struct DocTree {
    slots: Vec<Slot>,
    epoch: u32,
}

impl Default for DocTree {
    fn default() -> Self {
        Self::body()
    }
}

impl DocTree {
    /// Create an empty tree whose root has the given kind.
    pub fn new(root_kind: NodeKind) -> Self {
        let (root, _) = Slot::from_element(Element::new(root_kind), 0);
        Self {
            slots: vec![root],
            epoch: 0,
        }
    }

    /// Create an empty document body.
    pub fn body() -> Self {
        Self::new(NodeKind::BodySection)
    }

    /// Build a tree from a nested element, enforcing nesting rules.
    pub fn from_element(root: Element) -> DocloneResult<Self> {
        let (slot, children) = Slot::from_element(root, 0);
        let mut tree = Self {
            slots: vec![slot],
            epoch: 0,
        };
        let root = tree.root();
        for child in children {
            tree.append(root, child)?;
        }
        Ok(tree)
    }

    /// Nested element form of the whole tree.
    pub fn to_element(&self) -> Element {
        self.build_element(NodeId::ROOT)
    }

    /// Number of live nodes, including the root.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.live).count()
    }

    /// Check if the root has no children.
    pub fn is_empty(&self) -> bool {
        self.slots[0].children.is_empty()
    }

    fn slot(&self, node: NodeId) -> DocloneResult<&Slot> {
        self.slots
            .get(node.index as usize)
            .filter(|s| s.live && (node == NodeId::ROOT || s.epoch == node.epoch))
            .ok_or_else(|| DocloneError::invalid_node(format!("{node:?}")))
    }

    fn slot_mut(&mut self, node: NodeId) -> DocloneResult<&mut Slot> {
        self.slots
            .get_mut(node.index as usize)
            .filter(|s| s.live && (node == NodeId::ROOT || s.epoch == node.epoch))
            .ok_or_else(|| DocloneError::invalid_node(format!("{node:?}")))
    }

    fn build_element(&self, node: NodeId) -> Element {
        let slot = &self.slots[node.index as usize];
        let mut element = slot.node.shell();
        element.children = slot
            .children
            .iter()
            .map(|child| self.build_element(*child))
            .collect();
        element
    }

    /// Check that `element` and its whole subtree may live under `parent`.
    fn validate(parent: NodeKind, element: &Element) -> DocloneResult<()> {
        if !parent.accepts(element.kind) {
            return Err(DocloneError::append(parent, element.kind));
        }
        for child in &element.children {
            Self::validate(element.kind, child)?;
        }
        Ok(())
    }

    fn insert(&mut self, element: Element) -> NodeId {
        let (slot, children) = Slot::from_element(element, self.epoch);
        let id = NodeId {
            index: self.slots.len() as u32,
            epoch: self.epoch,
        };
        self.slots.push(slot);
        let child_ids: Vec<NodeId> = children.into_iter().map(|c| self.insert(c)).collect();
        self.slots[id.index as usize].children = child_ids;
        id
    }

    fn kill_subtree(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.slots[node.index as usize].children);
        for child in children {
            self.slots[child.index as usize].live = false;
            self.kill_subtree(child);
        }
    }
}

impl DocumentTree for DocTree {
    type NodeRef = NodeId;

    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn kind(&self, node: NodeId) -> DocloneResult<NodeKind> {
        Ok(self.slot(node)?.node.kind)
    }

    fn children(&self, node: NodeId) -> DocloneResult<Vec<NodeId>> {
        Ok(self.slot(node)?.children.clone())
    }

    fn copy_shell(&self, node: NodeId) -> DocloneResult<Element> {
        Ok(self.slot(node)?.node.shell())
    }

    fn copy_deep(&self, node: NodeId) -> DocloneResult<Element> {
        self.slot(node)?;
        Ok(self.build_element(node))
    }

    fn clear(&mut self, node: NodeId) -> DocloneResult<()> {
        self.slot(node)?;
        if node == NodeId::ROOT {
            self.slots.truncate(1);
            self.slots[0].children.clear();
            self.epoch = self.epoch.wrapping_add(1);
        } else {
            self.kill_subtree(node);
        }
        Ok(())
    }

    fn append(&mut self, parent: NodeId, element: Element) -> DocloneResult<NodeId> {
        let parent_kind = self.slot(parent)?.node.kind;
        Self::validate(parent_kind, &element)?;
        let id = self.insert(element);
        self.slot_mut(parent)?.children.push(id);
        Ok(id)
    }
}
