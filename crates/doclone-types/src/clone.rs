//! Clone records and the document summaries shown for them.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;
use crate::ids::{CloneId, DocumentId};

/// Persisted association between one master and one slave document.
///
/// Stored as JSON `{"id": "...", "master": "...", "slave": "..."}` under its
/// own id in the user's key-value store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CloneRecord {
    pub id: CloneId,
    pub master: DocumentId,
    pub slave: DocumentId,
}

impl CloneRecord {
    pub fn new(id: CloneId, master: DocumentId, slave: DocumentId) -> Self {
        Self { id, master, slave }
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> Result<String, TypesError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the stored JSON form.
    pub fn from_json(raw: &str) -> Result<Self, TypesError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Check whether `doc` is the master of this pair.
    pub fn is_master(&self, doc: &DocumentId) -> bool {
        &self.master == doc
    }

    /// Check whether `doc` is the slave of this pair.
    pub fn is_slave(&self, doc: &DocumentId) -> bool {
        &self.slave == doc
    }
}

/// Display data for a resolved document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSummary {
    pub id: DocumentId,
    pub name: String,
    pub url: String,
}

/// Clone relationships of one document.
///
/// `ancestors` are masters that clone *into* the document; `descendants`
/// are slaves cloned *from* it. Both follow registry iteration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneListing {
    pub ancestors: Vec<DocSummary>,
    pub descendants: Vec<DocSummary>,
}

impl CloneListing {
    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty() && self.descendants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(s: &str) -> DocumentId {
        DocumentId::parse(s).unwrap()
    }

    #[test]
    fn test_stored_layout() {
        let record = CloneRecord::new(CloneId::from_number(3), doc("m"), doc("s"));
        let json = record.to_json().unwrap();
        assert_eq!(json, r#"{"id":"3","master":"m","slave":"s"}"#);
        assert_eq!(CloneRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            CloneRecord::from_json("{\"id\":\"1\"}"),
            Err(TypesError::MalformedRecord(_))
        ));
        assert!(CloneRecord::from_json("not json").is_err());
    }

    #[test]
    fn test_from_json_rejects_unsafe_ids() {
        let raw = r#"{"id":"0","master":"../../escape","slave":"s"}"#;
        assert!(matches!(
            CloneRecord::from_json(raw),
            Err(TypesError::MalformedRecord(_))
        ));
        assert!(CloneRecord::from_json(r#"{"id":"a/b","master":"m","slave":"s"}"#).is_err());
    }

    #[test]
    fn test_roles() {
        let record = CloneRecord::new(CloneId::from_number(0), doc("x"), doc("y"));
        assert!(record.is_master(&doc("x")));
        assert!(record.is_slave(&doc("y")));
        assert!(!record.is_master(&doc("y")));
    }
}
