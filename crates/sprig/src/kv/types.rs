// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Type definitions for the KV store.

use std::fmt;

/// Result type for KV operations.
pub type KVResult<T> = Result<T, KVError>;

/// Error type for KV operations.
#[derive(Debug)]
pub enum KVError {
    /// Storage backend error.
    Storage(String),
    /// Invalid operation (e.g., empty key).
    InvalidOperation(String),
}

impl fmt::Display for KVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVError::Storage(msg) => write!(f, "Storage error: {}", msg),
            KVError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for KVError {}
