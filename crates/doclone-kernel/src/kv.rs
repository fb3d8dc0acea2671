//! Per-user key-value storage for clone records.
//!
//! The registry only needs a flat string map scoped to one user, iterated in
//! insertion order. [`MemoryKv`] keeps that in an `IndexMap`; the SQLite
//! backend lives in [`crate::db`].

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::DocloneResult;

/// String key-value store scoped to a single user.
pub trait KeyValueStore {
    /// Every entry, in insertion order.
    fn get_all(&self) -> DocloneResult<Vec<(String, String)>>;

    /// One entry.
    fn get(&self, key: &str) -> DocloneResult<Option<String>>;

    /// Insert or overwrite an entry. Overwriting keeps the original position.
    fn set(&self, key: &str, value: &str) -> DocloneResult<()>;

    /// Every key, in insertion order.
    fn keys(&self) -> DocloneResult<Vec<String>> {
        Ok(self.get_all()?.into_iter().map(|(k, _)| k).collect())
    }
}

type UserMaps = IndexMap<String, IndexMap<String, String>>;

/// In-memory key-value store.
///
/// Handles for different users share one backing map; each handle only sees
/// its own user's entries.
#[derive(Debug, Clone)]
pub struct MemoryKv {
    user: String,
    maps: Arc<RwLock<UserMaps>>,
}

impl MemoryKv {
    /// Fresh store, scoped to `user`.
    pub fn scoped(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            maps: Arc::default(),
        }
    }

    /// Handle onto the same backing map for another user.
    pub fn for_user(&self, user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            maps: Arc::clone(&self.maps),
        }
    }

    /// The user this handle is scoped to.
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl KeyValueStore for MemoryKv {
    fn get_all(&self) -> DocloneResult<Vec<(String, String)>> {
        let maps = self.maps.read();
        Ok(maps
            .get(&self.user)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    fn get(&self, key: &str) -> DocloneResult<Option<String>> {
        let maps = self.maps.read();
        Ok(maps.get(&self.user).and_then(|m| m.get(key)).cloned())
    }

    fn set(&self, key: &str, value: &str) -> DocloneResult<()> {
        let mut maps = self.maps.write();
        maps.entry(self.user.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
