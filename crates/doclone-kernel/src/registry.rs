//! Clone registry: the user's set of master/slave document pairs.
//!
//! Records live in a per-user [`KeyValueStore`] as JSON, each under its own
//! id. New ids are one past the largest numeric key; non-numeric keys are
//! ignored for allocation but still listed.

use doclone_types::{CloneId, CloneListing, CloneRecord, DocSummary, DocumentId};
use doclone_types::ids::numeric_key;

use crate::error::{DocloneError, DocloneResult};
use crate::kv::KeyValueStore;
use crate::store::DocumentStore;

/// Name suffix for documents created as clone targets.
pub const DEFAULT_CLONE_SUFFIX: &str = " - Clone";

/// Per-user registry of clone relationships.
#[derive(Debug, Clone)]
pub struct CloneRegistry<K> {
    kv: K,
    clone_suffix: String,
}

impl<K: KeyValueStore> CloneRegistry<K> {
    /// Registry over a user-scoped key-value store.
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            clone_suffix: DEFAULT_CLONE_SUFFIX.to_string(),
        }
    }

    /// Override the suffix appended to new clone document names.
    pub fn with_clone_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.clone_suffix = suffix.into();
        self
    }

    /// The backing store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Id the next `create_clone` will use.
    ///
    /// Fails with `DocloneError::Storage` once the largest key is `u64::MAX`;
    /// wrapping around would overwrite record `0`.
    pub fn next_id(&self) -> DocloneResult<CloneId> {
        let max = self.kv.keys()?.iter().filter_map(|k| numeric_key(k)).max();
        let next = match max {
            None => 0,
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| DocloneError::storage(format!("clone id space exhausted after {max}")))?,
        };
        Ok(CloneId::from_number(next))
    }

    /// Register a new clone of `master`.
    ///
    /// With no `destination`, a blank document named `"<master name> - Clone"`
    /// is created and becomes the slave. Not idempotent: every call allocates
    /// a new id, and without a destination, a new document.
    pub fn create_clone<S: DocumentStore>(
        &self,
        store: &S,
        master: &DocumentId,
        destination: Option<&DocumentId>,
    ) -> DocloneResult<CloneRecord> {
        let master_doc = store.describe(master)?;
        let id = self.next_id()?;

        let slave = match destination {
            Some(dest) => store.describe(dest)?.id,
            None => {
                let name = format!("{}{}", master_doc.name, self.clone_suffix);
                let doc = store.create(&name)?;
                let id = doc.id.clone();
                store.save_and_close(doc)?;
                id
            }
        };

        let record = CloneRecord::new(id, master.clone(), slave);
        self.kv.set(record.id.as_str(), &record.to_json()?)?;

        tracing::info!(
            clone = %record.id,
            master = %record.master,
            slave = %record.slave,
            "registered clone"
        );
        Ok(record)
    }

    /// Look up one record.
    pub fn get(&self, id: &CloneId) -> DocloneResult<Option<CloneRecord>> {
        match self.kv.get(id.as_str())? {
            Some(raw) => Ok(Some(CloneRecord::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    /// Every well-formed record, in store order. Malformed entries are logged
    /// and skipped.
    pub fn records(&self) -> DocloneResult<Vec<CloneRecord>> {
        let records = self
            .kv
            .get_all()?
            .into_iter()
            .filter_map(|(key, raw)| match CloneRecord::from_json(&raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(key = %key, "skipping malformed clone record: {e}");
                    None
                }
            })
            .collect();
        Ok(records)
    }

    /// Ancestors and descendants of `active`.
    ///
    /// Ancestors are masters of records whose slave is `active`; descendants
    /// are slaves of records whose master is `active`. Documents that can no
    /// longer be resolved are logged and left out.
    pub fn list_clones<S: DocumentStore>(
        &self,
        store: &S,
        active: &DocumentId,
    ) -> DocloneResult<CloneListing> {
        let mut listing = CloneListing::default();

        for record in self.records()? {
            if record.is_slave(active) {
                if let Some(summary) = resolve(store, &record, &record.master) {
                    listing.ancestors.push(summary);
                }
            }
            if record.is_master(active) {
                if let Some(summary) = resolve(store, &record, &record.slave) {
                    listing.descendants.push(summary);
                }
            }
        }

        tracing::debug!(
            doc = %active,
            ancestors = listing.ancestors.len(),
            descendants = listing.descendants.len(),
            "listed clones"
        );
        Ok(listing)
    }
}

fn resolve<S: DocumentStore>(store: &S, record: &CloneRecord, doc: &DocumentId) -> Option<DocSummary> {
    match store.describe(doc) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!(clone = %record.id, doc = %doc, "skipping unresolvable document: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use crate::store::MemoryDocumentStore;
    use doclone_types::Element;

    fn setup() -> (MemoryDocumentStore, CloneRegistry<MemoryKv>) {
        (MemoryDocumentStore::new(), CloneRegistry::new(MemoryKv::scoped("amy")))
    }

    #[test]
    fn test_ids_count_up_from_zero() {
        let (store, registry) = setup();
        let master = store.insert("Plan", Element::body()).unwrap();

        let ids: Vec<String> = (0..3)
            .map(|_| registry.create_clone(&store, &master, None).unwrap().id.to_string())
            .collect();
        assert_eq!(ids, ["0", "1", "2"]);
    }

    #[test]
    fn test_non_numeric_keys_start_at_zero() {
        let (_store, registry) = setup();
        registry.kv().set("alpha", "{}").unwrap();
        registry.kv().set("beta", "{}").unwrap();
        assert_eq!(registry.next_id().unwrap().as_str(), "0");
    }

    #[test]
    fn test_next_id_uses_maximum_not_last() {
        let (_store, registry) = setup();
        registry.kv().set("9", "{}").unwrap();
        registry.kv().set("3", "{}").unwrap();
        registry.kv().set("zeta", "{}").unwrap();
        assert_eq!(registry.next_id().unwrap().as_str(), "10");
    }

    #[test]
    fn test_next_id_at_u64_max_fails_without_overwrite() {
        let (store, registry) = setup();
        let master = store.insert("A", Element::body()).unwrap();
        let first = registry.create_clone(&store, &master, None).unwrap();
        registry.kv().set(&u64::MAX.to_string(), "{}").unwrap();

        assert!(matches!(registry.next_id(), Err(DocloneError::Storage(_))));
        assert!(matches!(
            registry.create_clone(&store, &master, None),
            Err(DocloneError::Storage(_))
        ));
        assert_eq!(registry.get(&first.id).unwrap(), Some(first));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_create_names_new_document() {
        let (store, registry) = setup();
        let master = store.insert("Quarterly Plan", Element::body()).unwrap();

        let record = registry.create_clone(&store, &master, None).unwrap();
        assert_eq!(record.master, master);
        assert_eq!(store.describe(&record.slave).unwrap().name, "Quarterly Plan - Clone");
        assert_eq!(registry.get(&record.id).unwrap(), Some(record));
    }

    #[test]
    fn test_create_with_destination_creates_nothing() {
        let (store, registry) = setup();
        let master = store.insert("A", Element::body()).unwrap();
        let dest = store.insert("B", Element::body()).unwrap();

        let record = registry.create_clone(&store, &master, Some(&dest)).unwrap();
        assert_eq!(record.slave, dest);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_create_errors() {
        let (store, registry) = setup();
        let missing = DocumentId::parse("missing").unwrap();
        assert!(matches!(
            registry.create_clone(&store, &missing, None),
            Err(DocloneError::Access(_))
        ));

        let mut store = store;
        let master = store.insert("A", Element::body()).unwrap();
        store.set_read_only(true);
        assert!(matches!(
            registry.create_clone(&store, &master, None),
            Err(DocloneError::Creation(_))
        ));
        assert!(registry.records().unwrap().is_empty());
    }

    #[test]
    fn test_custom_suffix() {
        let store = MemoryDocumentStore::new();
        let registry = CloneRegistry::new(MemoryKv::scoped("amy")).with_clone_suffix(" (copy)");
        let master = store.insert("Notes", Element::body()).unwrap();
        let record = registry.create_clone(&store, &master, None).unwrap();
        assert_eq!(store.describe(&record.slave).unwrap().name, "Notes (copy)");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let (store, registry) = setup();
        let master = store.insert("A", Element::body()).unwrap();
        registry.kv().set("junk", "not json").unwrap();
        registry.create_clone(&store, &master, None).unwrap();

        assert_eq!(registry.records().unwrap().len(), 1);
        assert!(registry.get(&CloneId::parse("junk").unwrap()).is_err());
        assert_eq!(registry.get(&CloneId::from_number(5)).unwrap(), None);
    }
}
