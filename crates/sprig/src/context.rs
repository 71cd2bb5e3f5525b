// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Per-request context.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::request::SprigRequest;
use crate::response::SprigResponse;

/// Everything a middleware or handler sees about one request.
///
/// `extras` is a free-form side-channel shared by every handler of the
/// request; the middleware chain uses it to record completion.
#[derive(Debug, Clone)]
pub struct Context {
    /// The incoming request.
    pub request: SprigRequest,
    /// The response being built.
    pub response: SprigResponse,
    /// Parameters captured by the matched route pattern.
    pub params: HashMap<String, String>,
    /// Per-request side-channel.
    pub extras: HashMap<String, JsonValue>,
}

impl Context {
    /// Creates a context with a default 200 response.
    pub fn new(request: SprigRequest) -> Self {
        Self {
            request,
            response: SprigResponse::default(),
            params: HashMap::new(),
            extras: HashMap::new(),
        }
    }

    /// Stores `true` under `key` in the side-channel.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.extras.insert(key.into(), JsonValue::Bool(true));
    }

    /// Returns true if `key` holds `true` in the side-channel.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.extras.get(key), Some(JsonValue::Bool(true)))
    }

    /// Gets a route parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }
}
