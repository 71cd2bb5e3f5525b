// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI KV store implementation using SQLite.

mod sqlite;

pub use sqlite::SqliteKVStore;

use sprig::kv::{KVError, KVResult, BUILD_NAMESPACE};
use std::path::Path;

/// Opens the persisted build cache under `data_dir`.
///
/// The data directory will be created if it doesn't exist.
pub fn open_build_cache(data_dir: impl AsRef<Path>) -> KVResult<SqliteKVStore> {
    let data_dir = data_dir.as_ref();
    std::fs::create_dir_all(data_dir).map_err(|e| {
        KVError::Storage(format!("Failed to create {}: {}", data_dir.display(), e))
    })?;
    SqliteKVStore::new(data_dir, BUILD_NAMESPACE)
}
