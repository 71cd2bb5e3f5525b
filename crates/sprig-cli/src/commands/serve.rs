// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Production server command.
//!
//! Artifacts are loaded from the persisted cache when their fingerprints
//! still match, so a prior `build` makes startup cheap. No watcher and no
//! push channel.

use std::sync::Arc;

use console::style;
use sprig::{Manifest, RefreshHub};

use super::{addr, prepare};
use crate::server::{create_server, AppState};

/// Runs the production server.
pub async fn run(manifest: Manifest, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let prepared = prepare(manifest, false).await?;
    let app = Arc::new(prepared.app);
    app.init().await;

    let addr = addr(&prepared.config, host, port);
    println!(
        "{} {}",
        style("Serving:").cyan(),
        style(format!("http://{}", addr)).green().bold()
    );

    create_server(&addr, Arc::new(AppState::new(app, RefreshHub::new()))).await
}
