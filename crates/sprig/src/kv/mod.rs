// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Key-Value store abstraction for the persisted build cache.
//!
//! The build cache keeps compiled bundles and their fingerprints under the
//! [`BUILD_NAMESPACE`] namespace:
//!
//! | Key | Value |
//! |---|---|
//! | `app.js` | JS bundle bytes |
//! | `js_version` | UTF-8 fingerprint of the JS bundle |
//! | `app.css` | CSS bundle bytes |
//! | `css_version` | UTF-8 fingerprint of the CSS bundle |
//!
//! # Implementations
//!
//! - **Core**: [`MemoryKVStore`], process-local
//! - **CLI**: SQLite-backed persistent storage

mod memory;
mod types;

pub use memory::MemoryKVStore;
pub use types::{KVError, KVResult};

/// Namespace holding build artifacts.
pub const BUILD_NAMESPACE: &str = "build";

/// Platform-agnostic KV store trait.
///
/// A store instance is bound to one namespace.
pub trait KVStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>>;

    /// Store a value, replacing any previous one.
    fn put(&self, key: &str, value: &[u8]) -> KVResult<()>;

    /// Delete a key.
    ///
    /// No error is returned if the key doesn't exist.
    fn delete(&self, key: &str) -> KVResult<()>;
}
