// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! SQLite-backed KV store implementation.

use rusqlite::{params, Connection};
use sprig::kv::{KVError, KVResult, KVStore};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed KV store.
///
/// Each namespace shares the same SQLite database but uses a namespace
/// column to separate data.
pub struct SqliteKVStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteKVStore {
    /// Creates a new SQLite-backed KV store.
    ///
    /// The database file is stored at `data_dir/kv.db`.
    pub fn new(data_dir: &Path, namespace: &str) -> KVResult<Self> {
        let db_path = data_dir.join("kv.db");
        let conn = Connection::open(&db_path)
            .map_err(|e| KVError::Storage(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn, namespace)
    }

    /// Creates a store backed by a private in-memory database.
    pub fn in_memory(namespace: &str) -> KVResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| KVError::Storage(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> KVResult<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value BLOB NOT NULL,
                PRIMARY KEY (namespace, key)
            )
            "#,
            [],
        )
        .map_err(|e| KVError::Storage(format!("Failed to create table: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    /// The namespace this store reads and writes.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl KVStore for SqliteKVStore {
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| KVError::Storage(e.to_string()))?;

        let result: Result<Vec<u8>, rusqlite::Error> = conn.query_row(
            "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2",
            params![&self.namespace, key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(KVError::Storage(e.to_string())),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> KVResult<()> {
        if key.is_empty() {
            return Err(KVError::InvalidOperation("Key cannot be empty".to_string()));
        }

        let conn = self
            .conn
            .lock()
            .map_err(|e| KVError::Storage(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO kv (namespace, key, value) VALUES (?1, ?2, ?3)",
            params![&self.namespace, key, value],
        )
        .map_err(|e| KVError::Storage(e.to_string()))?;

        Ok(())
    }

    fn delete(&self, key: &str) -> KVResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| KVError::Storage(e.to_string()))?;

        conn.execute(
            "DELETE FROM kv WHERE namespace = ?1 AND key = ?2",
            params![&self.namespace, key],
        )
        .map_err(|e| KVError::Storage(e.to_string()))?;

        Ok(())
    }
}
