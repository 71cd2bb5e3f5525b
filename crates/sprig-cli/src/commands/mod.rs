// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `build`: Build both frontend artifacts into the persisted cache
//! - `dev`: Start the development server with hot reload
//! - `serve`: Serve the application without dev tooling

/// Artifact build command.
pub mod build;
/// Development server command.
pub mod dev;
/// Production server command.
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use console::style;
use sprig::{Bundler, Manifest, Sprig, UnavailableBundler};
use tracing::warn;

use crate::config::Config;
use crate::kv::{open_build_cache, SqliteKVStore};
use crate::toolchain::{ensure_esbuild, EsbuildBundler};

/// Everything a command needs to run the application.
pub struct Prepared {
    /// Loaded `sprig.toml`.
    pub config: Config,
    /// The framework state, not yet initialized.
    pub app: Sprig,
    /// The persisted build cache backing `app`.
    pub store: Arc<SqliteKVStore>,
}

/// Loads configuration, resolves esbuild and opens the build cache for the
/// project in the current directory.
///
/// A missing esbuild is not fatal: builds fail and are logged while pages
/// keep rendering. Failing to open the build cache aborts.
pub async fn prepare(manifest: Manifest, dev: bool) -> anyhow::Result<Prepared> {
    let root = std::env::current_dir()?;
    prepare_in(root, manifest, dev).await
}

/// [`prepare`] for the project at `root`.
pub async fn prepare_in(root: PathBuf, manifest: Manifest, dev: bool) -> anyhow::Result<Prepared> {
    let config = Config::load_from(&root)?;

    let bundler: Arc<dyn Bundler> = match ensure_esbuild(&config.esbuild).await {
        Ok(tool) => Arc::new(EsbuildBundler::new(tool.path)),
        Err(e) => {
            warn!(error = %e, "esbuild unavailable");
            eprintln!(
                "{} {} {}",
                style("✗").red(),
                style("esbuild").cyan(),
                style(format!("unavailable, frontend builds will fail: {}", e)).red()
            );
            Arc::new(UnavailableBundler::new(format!("esbuild unavailable: {}", e)))
        }
    };

    let store = open_build_cache(root.join(&config.paths.data_dir))
        .map_err(|e| anyhow!("Failed to open build cache: {}", e))?;
    let store = Arc::new(store);

    let app = Sprig::new(config.options(&root, dev), manifest, bundler).with_store(store.clone());
    Ok(Prepared { config, app, store })
}

fn addr(config: &Config, host: Option<String>, port: Option<u16>) -> String {
    format!(
        "{}:{}",
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port)
    )
}
