//! SQLite persistence for per-user properties.
//!
//! One `properties` table keyed by `(user, key)`. Rows keep their rowid on
//! update, so reading back in rowid order yields insertion order.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::DocloneResult;
use crate::kv::KeyValueStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS properties (
    user TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER DEFAULT (unixepoch()),
    PRIMARY KEY (user, key)
);
"#;

/// SQLite-backed key-value store, scoped to one user.
///
/// Handles for different users share one connection.
#[derive(Clone)]
pub struct SqliteKv {
    user: String,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKv {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P, user: impl Into<String>) -> DocloneResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn, user.into())
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory(user: impl Into<String>) -> DocloneResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, user.into())
    }

    fn init(conn: Connection, user: String) -> DocloneResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            user,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Handle onto the same database for another user.
    pub fn for_user(&self, user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            conn: Arc::clone(&self.conn),
        }
    }

    /// The user this handle is scoped to.
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl std::fmt::Debug for SqliteKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteKv").field("user", &self.user).finish_non_exhaustive()
    }
}

impl KeyValueStore for SqliteKv {
    fn get_all(&self) -> DocloneResult<Vec<(String, String)>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT key, value FROM properties WHERE user = ?1 ORDER BY rowid")?;
        let rows = stmt.query_map(params![self.user], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get(&self, key: &str) -> DocloneResult<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM properties WHERE user = ?1 AND key = ?2",
                params![self.user, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> DocloneResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO properties (user, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(user, key) DO UPDATE SET value = excluded.value, updated_at = unixepoch()",
            params![self.user, key, value],
        )?;
        Ok(())
    }
}
