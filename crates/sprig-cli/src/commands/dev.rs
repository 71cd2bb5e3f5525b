// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Development server command with hot reload support.

use std::sync::Arc;
use std::time::Instant;

use console::style;
use sprig::{ChangeEvent, HotReloadCoordinator, Manifest, RefreshHub};
use tokio::sync::mpsc;
use tracing::debug;

use super::{addr, prepare};
use crate::server::{create_server, AppState};
use crate::watcher::FileWatcher;

/// Runs the development server with hot reload.
pub async fn run(
    manifest: Manifest,
    host: Option<String>,
    port: Option<u16>,
    quiet: bool,
) -> anyhow::Result<()> {
    let prepared = prepare(manifest, true).await?;
    let config = prepared.config;
    let app = Arc::new(prepared.app);

    let start = Instant::now();
    app.init().await;
    if !quiet {
        println!(
            "  {} {} {}",
            style("✓").green(),
            style("Initial build").dim(),
            style(format!("{}ms", start.elapsed().as_millis())).dim()
        );
    }

    let hub = RefreshHub::new();
    let (tx, rx) = mpsc::unbounded_channel::<ChangeEvent>();
    tokio::spawn(HotReloadCoordinator::new(app.clone(), hub.clone()).run(rx));

    let options = app.options();
    let layout = &options.layout;
    let watched: Vec<_> = [
        &layout.frontend_components,
        &layout.frontend_files,
        &layout.frontend_css,
        &layout.backend_components,
        &layout.backend_api,
    ]
    .into_iter()
    .map(|dir| options.root.join(dir))
    .collect();

    let _watcher = FileWatcher::new(&watched, options.root.clone(), move |changes| {
        for change in changes {
            if !quiet {
                println!("  {} {}", style("↻").cyan(), style(&change.path).dim());
            }
            if tx.send(change).is_err() {
                debug!("Hot reload coordinator stopped");
            }
        }
    })?;

    let addr = addr(&config, host, port);
    if !quiet {
        println!(
            "{} {}",
            style("Server:").cyan(),
            style(format!("http://{}", addr)).green().bold()
        );
        println!(
            "{} {}",
            style("Status:").cyan(),
            style("Watching for changes...").dim()
        );
        println!();
    }

    create_server(&addr, Arc::new(AppState::new(app, hub))).await
}
