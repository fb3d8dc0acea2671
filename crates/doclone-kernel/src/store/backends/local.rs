//! Local filesystem document store.
//!
//! Each document is one JSON file, `<root>/<id>.json`:
//!
//! ```json
//! {"id": "0190...", "name": "Quarterly Plan", "body": {"kind": "BODY_SECTION", ...}}
//! ```
//!
//! Writes go through a temporary file and a rename so a crash never leaves
//! a half-written document behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use doclone_types::{DocSummary, DocumentId, Element};
use serde::{Deserialize, Serialize};

use crate::error::{DocloneError, DocloneResult};
use crate::store::ops::{Document, DocumentStore};
use crate::tree::DocTree;

#[derive(Serialize, Deserialize)]
struct StoredDocument {
    id: DocumentId,
    name: String,
    body: Element,
}

/// Metadata-only view of a stored document; the body is skipped.
#[derive(Deserialize)]
struct StoredHeader {
    id: DocumentId,
    name: String,
}

/// Directory-backed document store.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> DocloneResult<Self> {
        let root: PathBuf = root.into();
        fs::create_dir_all(&root)?;
        let root = root.canonicalize().unwrap_or(root);
        Ok(Self { root })
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a new document with the given body, returning its fresh id.
    pub fn insert(&self, name: &str, body: Element) -> DocloneResult<DocumentId> {
        let tree = DocTree::from_element(body)?;
        let id = DocumentId::generate();
        self.write(&id, name, &tree)
            .map_err(|e| DocloneError::creation(format!("{name:?}: {e}")))?;
        Ok(id)
    }

    /// Summaries of every document in the store, sorted by id.
    pub fn list(&self) -> DocloneResult<Vec<DocSummary>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Ok(id) = DocumentId::parse(stem) else {
                continue;
            };
            match self.describe(&id) {
                Ok(summary) => out.push(summary),
                Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable document: {e}"),
            }
        }
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    fn path_for(&self, id: &DocumentId) -> PathBuf {
        // DocumentId rejects separators and dot names on parse and on
        // deserialize, so this stays under root.
        self.root.join(format!("{id}.json"))
    }

    fn url_for(&self, id: &DocumentId) -> String {
        format!("file://{}", self.path_for(id).display())
    }

    fn read_bytes(&self, id: &DocumentId) -> DocloneResult<Vec<u8>> {
        fs::read(self.path_for(id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DocloneError::access(format!("no document {id}")),
            _ => DocloneError::access(format!("{id}: {e}")),
        })
    }

    /// A file must carry the id it is stored under.
    fn check_stored_id(requested: &DocumentId, stored: &DocumentId) -> DocloneResult<()> {
        if requested == stored {
            Ok(())
        } else {
            Err(DocloneError::access(format!(
                "{requested}: file claims to be document {stored}"
            )))
        }
    }

    fn write(&self, id: &DocumentId, name: &str, tree: &DocTree) -> DocloneResult<()> {
        let stored = StoredDocument {
            id: id.clone(),
            name: name.to_string(),
            body: tree.to_element(),
        };
        let bytes = serde_json::to_vec_pretty(&stored)?;
        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl DocumentStore for LocalDocumentStore {
    type Tree = DocTree;

    fn open(&self, id: &DocumentId) -> DocloneResult<Document<DocTree>> {
        let bytes = self.read_bytes(id)?;
        let stored: StoredDocument = serde_json::from_slice(&bytes)
            .map_err(|e| DocloneError::access(format!("{id}: corrupt document: {e}")))?;
        Self::check_stored_id(id, &stored.id)?;
        let tree = DocTree::from_element(stored.body)
            .map_err(|e| DocloneError::access(format!("{id}: corrupt document: {e}")))?;
        Ok(Document {
            url: self.url_for(id),
            id: id.clone(),
            name: stored.name,
            tree,
        })
    }

    fn create(&self, name: &str) -> DocloneResult<Document<DocTree>> {
        let id = DocumentId::generate();
        let tree = DocTree::body();
        self.write(&id, name, &tree)
            .map_err(|e| DocloneError::creation(format!("{name:?}: {e}")))?;
        Ok(Document {
            url: self.url_for(&id),
            id,
            name: name.to_string(),
            tree,
        })
    }

    fn save_and_close(&self, doc: Document<DocTree>) -> DocloneResult<()> {
        self.write(&doc.id, &doc.name, &doc.tree)
    }

    fn describe(&self, id: &DocumentId) -> DocloneResult<DocSummary> {
        let bytes = self.read_bytes(id)?;
        let header: StoredHeader = serde_json::from_slice(&bytes)
            .map_err(|e| DocloneError::access(format!("{id}: corrupt document: {e}")))?;
        Self::check_stored_id(id, &header.id)?;
        Ok(DocSummary {
            url: self.url_for(id),
            id: id.clone(),
            name: header.name,
        })
    }
}
