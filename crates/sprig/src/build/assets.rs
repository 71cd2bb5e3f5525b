// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;

/// In-memory serving cache of built artifacts, keyed by file name.
///
/// Last writer wins; readers always see a complete artifact.
#[derive(Debug, Default)]
pub struct AssetCache {
    files: RwLock<HashMap<String, Bytes>>,
}

impl AssetCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets an artifact by file name.
    pub fn get(&self, file_name: &str) -> Option<Bytes> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file_name)
            .cloned()
    }

    /// Stores an artifact, replacing the previous one.
    pub fn insert(&self, file_name: impl Into<String>, bytes: Bytes) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file_name.into(), bytes);
    }
}
