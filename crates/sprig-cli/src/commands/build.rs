// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Build command: compiles both frontend artifacts into the persisted cache.

use std::time::{Duration, Instant};

use anyhow::bail;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use sprig::kv::KVStore;
use sprig::{ArtifactKind, BuildStatus, Manifest};

use super::prepare;

/// Runs the build command. `force` discards persisted artifacts first.
pub async fn run(manifest: Manifest, force: bool) -> anyhow::Result<()> {
    let prepared = prepare(manifest, false).await?;
    let app = prepared.app;

    if force {
        for kind in [ArtifactKind::Js, ArtifactKind::Css] {
            prepared.store.delete(kind.file_name())?;
            prepared.store.delete(kind.version_key())?;
        }
    }

    let mut failed = Vec::new();
    for kind in [ArtifactKind::Js, ArtifactKind::Css] {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(kind.file_name());
        pb.enable_steady_tick(Duration::from_millis(80));

        let start = Instant::now();
        let status = match kind {
            ArtifactKind::Js => app.build_frontend().await,
            ArtifactKind::Css => app.build_css().await,
        };
        let elapsed = style(format!("{}ms", start.elapsed().as_millis())).dim();

        match status {
            BuildStatus::Loaded => pb.finish_with_message(format!(
                "{} {} {} {}",
                style("✓").green(),
                kind.file_name(),
                style("(cached)").dim(),
                elapsed
            )),
            BuildStatus::Built => pb.finish_with_message(format!(
                "{} {} {}",
                style("✓").green(),
                kind.file_name(),
                elapsed
            )),
            BuildStatus::Failed => {
                pb.finish_with_message(format!("{} {}", style("✗").red(), kind.file_name()));
                failed.push(kind.file_name());
            }
        }
    }

    if !failed.is_empty() {
        bail!("Build failed: {}", failed.join(", "));
    }
    Ok(())
}
