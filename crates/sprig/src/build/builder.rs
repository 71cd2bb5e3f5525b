// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::{concat_stylesheets, fingerprint, js_entry, ArtifactKind, AssetCache, BuildStatus, Bundler, JsBundleRequest};
use crate::config::Layout;
use crate::error::Result;
use crate::kv::KVStore;
use crate::registry::discover;

/// Builds, persists and serves the frontend artifacts.
pub struct AssetBuilder {
    root: PathBuf,
    layout: Layout,
    dev: bool,
    bundler: Arc<dyn Bundler>,
    store: Option<Arc<dyn KVStore>>,
    assets: AssetCache,
    js_lock: Mutex<()>,
    css_lock: Mutex<()>,
}

impl AssetBuilder {
    /// Creates a builder without a persisted cache.
    pub fn new(root: impl Into<PathBuf>, layout: Layout, dev: bool, bundler: Arc<dyn Bundler>) -> Self {
        Self {
            root: root.into(),
            layout,
            dev,
            bundler,
            store: None,
            assets: AssetCache::new(),
            js_lock: Mutex::new(()),
            css_lock: Mutex::new(()),
        }
    }

    /// Persists artifacts and fingerprints in `store`.
    pub fn with_store(mut self, store: Arc<dyn KVStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files whose metadata feeds the fingerprint of `kind`.
    pub fn inputs(&self, kind: ArtifactKind) -> Vec<String> {
        match kind {
            ArtifactKind::Js => {
                let mut files = discover(&self.root, &self.layout.frontend_components, &["tsx"]);
                files.extend(discover(&self.root, &self.layout.frontend_files, &["ts", "js"]));
                files
            }
            ArtifactKind::Css => discover(&self.root, &self.layout.frontend_css, &["css"]),
        }
    }

    /// Current fingerprint of `kind`.
    pub async fn fingerprint(&self, kind: ArtifactKind) -> String {
        fingerprint(&self.root, &self.inputs(kind), self.dev).await
    }

    /// The served bytes of `kind`, if it was ever built or loaded.
    pub fn asset(&self, kind: ArtifactKind) -> Option<Bytes> {
        self.assets.get(kind.file_name())
    }

    /// Loads or rebuilds `app.js` from `views` (path and registered name).
    pub async fn build_js(&self, views: &[(String, String)]) -> BuildStatus {
        let request = JsBundleRequest {
            entry: js_entry(views),
            resolve_dir: self.root.clone(),
            dev: self.dev,
        };
        self.get_or_build(ArtifactKind::Js, || self.bundler.bundle_js(request))
            .await
    }

    /// Loads or rebuilds `app.css`.
    ///
    /// Development builds cache the concatenation verbatim.
    pub async fn build_css(&self) -> BuildStatus {
        let files = self.inputs(ArtifactKind::Css);
        self.get_or_build(ArtifactKind::Css, || self.css_artifact(&files))
            .await
    }

    async fn css_artifact(&self, files: &[String]) -> Result<Vec<u8>> {
        let css = concat_stylesheets(&self.root, files).await?;
        if self.dev {
            return Ok(css.into_bytes());
        }
        self.bundler.minify_css(css, self.root.clone()).await
    }

    async fn get_or_build<F, Fut>(&self, kind: ArtifactKind, build: F) -> BuildStatus
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        let _guard = match kind {
            ArtifactKind::Js => self.js_lock.lock().await,
            ArtifactKind::Css => self.css_lock.lock().await,
        };

        let version = self.fingerprint(kind).await;
        if let Some(bytes) = self.load_persisted(kind, &version) {
            self.assets.insert(kind.file_name(), bytes);
            info!(artifact = kind.file_name(), "Loaded frontend resources");
            return BuildStatus::Loaded;
        }

        match build().await {
            Ok(bytes) => {
                self.persist(kind, &version, &bytes);
                self.assets.insert(kind.file_name(), Bytes::from(bytes));
                info!(artifact = kind.file_name(), dev = self.dev, "Built frontend resources");
                BuildStatus::Built
            }
            Err(err) => {
                error!(artifact = kind.file_name(), error = %err, "Error building frontend resources");
                BuildStatus::Failed
            }
        }
    }

    fn load_persisted(&self, kind: ArtifactKind, version: &str) -> Option<Bytes> {
        let store = self.store.as_ref()?;
        let stored = match store.get(kind.version_key()) {
            Ok(stored) => stored?,
            Err(err) => {
                warn!(key = kind.version_key(), error = %err, "Could not read build cache");
                return None;
            }
        };
        if stored != version.as_bytes() {
            return None;
        }
        match store.get(kind.file_name()) {
            Ok(bytes) => bytes.map(Bytes::from),
            Err(err) => {
                warn!(key = kind.file_name(), error = %err, "Could not read build cache");
                None
            }
        }
    }

    fn persist(&self, kind: ArtifactKind, version: &str, bytes: &[u8]) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let written = store
            .put(kind.file_name(), bytes)
            .and_then(|_| store.put(kind.version_key(), version.as_bytes()));
        if let Err(err) = written {
            warn!(artifact = kind.file_name(), error = %err, "Could not persist build cache");
        }
    }
}
