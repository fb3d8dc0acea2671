//! Document store operations trait.

use doclone_types::{DocSummary, DocumentId};

use crate::error::DocloneResult;
use crate::tree::DocumentTree;

/// An open document: metadata plus a working copy of its body tree.
#[derive(Debug, Clone)]
pub struct Document<T> {
    pub id: DocumentId,
    pub name: String,
    pub url: String,
    pub tree: T,
}

impl<T> Document<T> {
    /// Display data for this document.
    pub fn summary(&self) -> DocSummary {
        DocSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
        }
    }
}

/// Host document environment.
///
/// Methods take `&self`; backends that hold state guard it internally so a
/// store can be shared between a registry and a synchronizer.
pub trait DocumentStore {
    /// Tree type backing each document's body.
    type Tree: DocumentTree;

    /// Open a document by id.
    ///
    /// Fails with `DocloneError::Access` if it does not exist or cannot be read.
    fn open(&self, id: &DocumentId) -> DocloneResult<Document<Self::Tree>>;

    /// Create a new blank document with a fresh id.
    ///
    /// Fails with `DocloneError::Creation`.
    fn create(&self, name: &str) -> DocloneResult<Document<Self::Tree>>;

    /// Persist a document's working copy and release it.
    fn save_and_close(&self, doc: Document<Self::Tree>) -> DocloneResult<()>;

    /// Release a document without persisting changes.
    fn close(&self, doc: Document<Self::Tree>) -> DocloneResult<()> {
        drop(doc);
        Ok(())
    }

    /// Resolve a document to `{id, name, url}`.
    ///
    /// The default opens and save-and-closes the document, which touches its
    /// modification time. Backends with cheaper metadata access override it.
    fn describe(&self, id: &DocumentId) -> DocloneResult<DocSummary> {
        let doc = self.open(id)?;
        let summary = doc.summary();
        self.save_and_close(doc)?;
        Ok(summary)
    }
}
