// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! File system watching for hot reload.
//!
//! [`FileWatcher`] turns debounced notify events into typed
//! [`ChangeEvent`]s relative to the project root.
//!
//! # Features
//!
//! - Debounced file change events (750ms)
//! - Filters for source file types (.tsx, .ts, .js, .css, .rs)
//! - Recursive directory watching

use notify::event::{Event, EventKind};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use sprig::{ChangeEvent, ChangeKind};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Debounce window for filesystem events.
pub const DEBOUNCE: Duration = Duration::from_millis(750);

const WATCHED_EXTENSIONS: &[&str] = &["tsx", "ts", "js", "css", "rs"];

/// Watches a project directory and reports relevant changes.
///
/// Events stop when the watcher is dropped.
pub struct FileWatcher {
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl FileWatcher {
    /// Watches every existing directory in `paths` recursively. `on_change`
    /// receives each debounced batch of relevant changes, with paths
    /// relative to `base_path`.
    pub fn new<F>(paths: &[PathBuf], base_path: PathBuf, on_change: F) -> anyhow::Result<Self>
    where
        F: Fn(Vec<ChangeEvent>) + Send + 'static,
    {
        let mut debouncer = new_debouncer(DEBOUNCE, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let changes = to_change_events(events.iter().map(|e| &e.event), &base_path);
                    if !changes.is_empty() {
                        on_change(changes);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        warn!(error = %error, "File watcher error");
                    }
                }
            }
        })?;

        for path in paths {
            if path.is_dir() {
                debouncer.watch(path, RecursiveMode::Recursive)?;
            } else {
                debug!(path = %path.display(), "Not watching missing directory");
            }
        }

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

fn change_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => ChangeKind::Other,
    }
}

fn is_watched(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext))
}

fn to_change_events<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    base_path: &Path,
) -> Vec<ChangeEvent> {
    let mut changes: Vec<ChangeEvent> = Vec::new();
    for event in events {
        let kind = change_kind(&event.kind);
        for path in event.paths.iter().filter(|p| is_watched(p)) {
            let relative = path.strip_prefix(base_path).unwrap_or(path);
            let change = ChangeEvent::new(kind, relative);
            if !changes.contains(&change) {
                changes.push(change);
            }
        }
    }
    changes
}
