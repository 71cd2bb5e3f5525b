// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Input of a JavaScript bundle build.
#[derive(Debug, Clone)]
pub struct JsBundleRequest {
    /// Source of the virtual entry module.
    pub entry: String,
    /// Directory the entry's relative imports resolve against.
    pub resolve_dir: PathBuf,
    /// Development build: unminified, with JSX dev diagnostics.
    pub dev: bool,
}

/// External bundler used for both artifacts.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Bundles the entry module for the browser.
    async fn bundle_js(&self, request: JsBundleRequest) -> Result<Vec<u8>>;

    /// Minifies a stylesheet.
    async fn minify_css(&self, css: String, resolve_dir: PathBuf) -> Result<Vec<u8>>;
}

/// A bundler that always fails, used when no real bundler is available.
#[derive(Debug, Clone)]
pub struct UnavailableBundler {
    reason: String,
}

impl UnavailableBundler {
    /// Creates a bundler failing with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Bundler for UnavailableBundler {
    async fn bundle_js(&self, _request: JsBundleRequest) -> Result<Vec<u8>> {
        Err(Error::Bundle(self.reason.clone()))
    }

    async fn minify_css(&self, _css: String, _resolve_dir: PathBuf) -> Result<Vec<u8>> {
        Err(Error::Bundle(self.reason.clone()))
    }
}
