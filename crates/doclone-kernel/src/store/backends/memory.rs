//! In-memory document store.
//!
//! Used for testing and embedding. All documents are lost when dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use doclone_types::{DocSummary, DocumentId, Element};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::{DocloneError, DocloneResult};
use crate::store::ops::{Document, DocumentStore};
use crate::tree::DocTree;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    tree: DocTree,
}

/// In-memory document store.
///
/// Thread-safe via internal `RwLock`. `open` hands out a clone of the stored
/// tree; `save_and_close` writes it back.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<IndexMap<DocumentId, Entry>>,
    read_only: bool,
    saves: AtomicU64,
}

impl MemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses to create or save documents.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Set whether this store is read-only.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Add a document with the given body, returning its fresh id.
    pub fn insert(&self, name: impl Into<String>, body: Element) -> DocloneResult<DocumentId> {
        let tree = DocTree::from_element(body)?;
        let id = DocumentId::generate();
        self.docs.write().insert(
            id.clone(),
            Entry {
                name: name.into(),
                tree,
            },
        );
        Ok(id)
    }

    /// Drop a document, as if it had been deleted by its owner.
    pub fn remove(&self, id: &DocumentId) -> bool {
        self.docs.write().shift_remove(id).is_some()
    }

    /// Current stored body of a document.
    pub fn body(&self, id: &DocumentId) -> Option<Element> {
        self.docs.read().get(id).map(|e| e.tree.to_element())
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Number of successful `save_and_close` calls so far.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }

    fn url_for(id: &DocumentId) -> String {
        format!("memory://{id}")
    }
}

impl DocumentStore for MemoryDocumentStore {
    type Tree = DocTree;

    fn open(&self, id: &DocumentId) -> DocloneResult<Document<DocTree>> {
        let docs = self.docs.read();
        let entry = docs
            .get(id)
            .ok_or_else(|| DocloneError::access(format!("no document {id}")))?;
        Ok(Document {
            id: id.clone(),
            name: entry.name.clone(),
            url: Self::url_for(id),
            tree: entry.tree.clone(),
        })
    }

    fn create(&self, name: &str) -> DocloneResult<Document<DocTree>> {
        if self.read_only {
            return Err(DocloneError::creation(format!("{name:?}: store is read-only")));
        }
        let id = DocumentId::generate();
        let tree = DocTree::body();
        self.docs.write().insert(
            id.clone(),
            Entry {
                name: name.to_string(),
                tree: tree.clone(),
            },
        );
        Ok(Document {
            url: Self::url_for(&id),
            id,
            name: name.to_string(),
            tree,
        })
    }

    fn save_and_close(&self, doc: Document<DocTree>) -> DocloneResult<()> {
        if self.read_only {
            return Err(DocloneError::access(format!("{}: store is read-only", doc.id)));
        }
        let mut docs = self.docs.write();
        let entry = docs
            .get_mut(&doc.id)
            .ok_or_else(|| DocloneError::access(format!("no document {}", doc.id)))?;
        entry.name = doc.name;
        entry.tree = doc.tree;
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn describe(&self, id: &DocumentId) -> DocloneResult<DocSummary> {
        let docs = self.docs.read();
        let entry = docs
            .get(id)
            .ok_or_else(|| DocloneError::access(format!("no document {id}")))?;
        Ok(DocSummary {
            id: id.clone(),
            name: entry.name.clone(),
            url: Self::url_for(id),
        })
    }
}
