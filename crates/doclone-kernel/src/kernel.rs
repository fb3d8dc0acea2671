//! The Kernel: one user's clone registry bound to a document store.
//!
//! Every operation works relative to an "active" document, the one the user
//! has open. A kernel owns:
//! - A [`DocumentStore`] holding document bodies
//! - A [`CloneRegistry`] over the user's key-value properties

use doclone_types::{CloneId, CloneListing, CloneRecord, DocumentId};

use crate::config::Config;
use crate::error::{DocloneError, DocloneResult};
use crate::kv::KeyValueStore;
use crate::mirror::{self, SyncReport};
use crate::registry::CloneRegistry;
use crate::store::DocumentStore;

/// Clone registry plus the store its records point into.
pub struct Kernel<S, K> {
    store: S,
    registry: CloneRegistry<K>,
}

impl<S, K> std::fmt::Debug for Kernel<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel").finish_non_exhaustive()
    }
}

impl<S: DocumentStore, K: KeyValueStore> Kernel<S, K> {
    /// Kernel with the default clone suffix.
    pub fn new(store: S, kv: K) -> Self {
        Self {
            store,
            registry: CloneRegistry::new(kv),
        }
    }

    /// Kernel honoring configured naming.
    pub fn with_config(store: S, kv: K, config: &Config) -> Self {
        Self {
            store,
            registry: CloneRegistry::new(kv).with_clone_suffix(config.clone_suffix.clone()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &CloneRegistry<K> {
        &self.registry
    }

    /// Register `active` as the master of a new clone.
    pub fn create_clone(
        &self,
        active: &DocumentId,
        destination: Option<&DocumentId>,
    ) -> DocloneResult<CloneRecord> {
        self.registry.create_clone(&self.store, active, destination)
    }

    /// Documents `active` was cloned from, and documents cloned from it.
    pub fn list_clones(&self, active: &DocumentId) -> DocloneResult<CloneListing> {
        self.registry.list_clones(&self.store, active)
    }

    /// Mirror the active document into `slave`.
    pub fn sync_with(&self, active: &DocumentId, slave: &DocumentId) -> DocloneResult<SyncReport> {
        mirror::synchronize_documents(&self.store, active, slave)
    }

    /// Mirror a registered clone's master into its slave.
    pub fn sync_clone(&self, id: &CloneId) -> DocloneResult<SyncReport> {
        let record = self
            .registry
            .get(id)?
            .ok_or_else(|| DocloneError::not_found(format!("clone {id}")))?;
        mirror::synchronize_documents(&self.store, &record.master, &record.slave)
    }

    /// Mirror `active` into every registered descendant.
    ///
    /// Stops at the first failing clone; descendants already synchronized
    /// keep their new content.
    pub fn sync_descendants(&self, active: &DocumentId) -> DocloneResult<SyncReport> {
        let mut reports = Vec::new();
        for record in self.registry.records()? {
            if record.is_master(active) {
                tracing::debug!(clone = %record.id, slave = %record.slave, "syncing descendant");
                reports.push(mirror::synchronize_documents(&self.store, active, &record.slave)?);
            }
        }
        let report = mirror::total(reports);
        tracing::info!(doc = %active, %report, "synchronized descendants");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use crate::store::MemoryDocumentStore;
    use doclone_types::Element;

    fn kernel() -> Kernel<MemoryDocumentStore, MemoryKv> {
        Kernel::new(MemoryDocumentStore::new(), MemoryKv::scoped("amy"))
    }

    #[test]
    fn test_clone_then_sync() {
        let kernel = kernel();
        let master = kernel
            .store()
            .insert("Design", Element::body().with_child(Element::paragraph("hello")))
            .unwrap();

        let record = kernel.create_clone(&master, None).unwrap();
        assert_eq!(kernel.store().body(&record.slave).unwrap(), Element::body());

        let report = kernel.sync_clone(&record.id).unwrap();
        assert_eq!(report.copied, 2);
        assert_eq!(kernel.store().body(&record.slave), kernel.store().body(&master));
    }

    #[test]
    fn test_sync_unknown_clone() {
        let kernel = kernel();
        assert!(matches!(
            kernel.sync_clone(&CloneId::from_number(4)),
            Err(DocloneError::NotFound(_))
        ));
    }

    #[test]
    fn test_sync_descendants() {
        let kernel = kernel();
        let master = kernel
            .store()
            .insert("M", Element::body().with_child(Element::paragraph("x")))
            .unwrap();
        let a = kernel.create_clone(&master, None).unwrap();
        let b = kernel.create_clone(&master, None).unwrap();
        let other = kernel.store().insert("O", Element::body()).unwrap();
        kernel.create_clone(&other, None).unwrap();

        let report = kernel.sync_descendants(&master).unwrap();
        assert_eq!(report.copied, 4);
        for slave in [a.slave, b.slave] {
            assert_eq!(kernel.store().body(&slave).unwrap().plain_text(), "x");
        }
    }

    #[test]
    fn test_config_suffix() {
        let config = Config {
            clone_suffix: " copy".into(),
            ..Config::default()
        };
        let kernel = Kernel::with_config(MemoryDocumentStore::new(), MemoryKv::scoped("amy"), &config);
        let master = kernel.store().insert("Doc", Element::body()).unwrap();
        let record = kernel.create_clone(&master, None).unwrap();
        assert_eq!(kernel.store().describe(&record.slave).unwrap().name, "Doc copy");
    }
}
