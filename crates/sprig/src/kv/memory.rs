// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! In-memory KV store implementation for testing.

use super::{KVError, KVResult, KVStore};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory KV store implementation.
///
/// Useful for testing and development. Data is lost when the process exits.
pub struct MemoryKVStore {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKVStore {
    /// Create a new in-memory KV store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryKVStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KVStore for MemoryKVStore {
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>> {
        let data = self.data.read().map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> KVResult<()> {
        if key.is_empty() {
            return Err(KVError::InvalidOperation("Key cannot be empty".to_string()));
        }
        let mut data = self.data.write().map_err(|e| KVError::Storage(e.to_string()))?;
        data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> KVResult<()> {
        let mut data = self.data.write().map_err(|e| KVError::Storage(e.to_string()))?;
        data.remove(key);
        Ok(())
    }
}
