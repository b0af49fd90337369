use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::error::{StoreError, StoreResult};
use super::kv::KeyValueStore;

/// SQLite-backed key-value store
pub struct Database {
    conn: Option<Connection>,
}

impl Database {
    /// Open or create the database file at `path`
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened board database");

        let db = Self { conn: Some(conn) };
        db.init_schema()?;
        Ok(db)
    }

    /// Open a throwaway database that lives only as long as the value
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Self {
            conn: Some(Connection::open_in_memory()?),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = self
            .conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        let found = self
            .conn()?
            .query_row("SELECT 1 FROM kv WHERE key = ?1", params![key], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn close(&mut self) -> StoreResult<()> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, err)| StoreError::Sqlite(err)),
            None => Ok(()),
        }
    }
}
