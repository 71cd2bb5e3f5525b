// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Hot-reload coordination for development mode.
//!
//! A file watcher sends [`ChangeEvent`]s into a single-consumer channel. The
//! [`HotReloadCoordinator`] drains the channel, classifies each path into a
//! [`ReloadArea`], re-runs only the affected subsystems and then notifies
//! every connected dev client through the [`RefreshHub`].

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::app::Sprig;
use crate::config::Layout;
use crate::registry::normalize_path;

/// Path of the dev push channel.
pub const LIVERELOAD_PATH: &str = "/__sprig/livereload";

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The file was created.
    Created,
    /// The file's contents or metadata changed.
    Modified,
    /// The file was removed.
    Removed,
    /// Anything else the watcher reports.
    Other,
}

/// A typed filesystem change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// What happened.
    pub kind: ChangeKind,
    /// Path relative to the project root.
    pub path: String,
}

impl ChangeEvent {
    /// Creates an event for `path`, normalizing separators.
    pub fn new(kind: ChangeKind, path: impl AsRef<Path>) -> Self {
        Self {
            kind,
            path: normalize_path(path.as_ref()),
        }
    }
}

/// Subsystem affected by a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadArea {
    /// Re-register API routes.
    ApiRoutes,
    /// Rescan backend view middleware.
    ViewMiddleware,
    /// Rebuild `app.css`.
    Stylesheets,
    /// Rebuild `app.js` and rescan frontend views.
    FrontendViews,
}

/// Classifies a changed path by the directory it falls under.
pub fn classify(layout: &Layout, path: &str) -> Option<ReloadArea> {
    let path = format!("/{}", path.trim_start_matches('/'));
    let under = |dir: &str| path.contains(&format!("/{}/", dir.trim_matches('/')));

    if under(&layout.backend_api) {
        Some(ReloadArea::ApiRoutes)
    } else if under(&layout.backend_components) {
        Some(ReloadArea::ViewMiddleware)
    } else if under(&layout.frontend_css) {
        Some(ReloadArea::Stylesheets)
    } else if under(&layout.frontend_components) || under(&layout.frontend_files) {
        Some(ReloadArea::FrontendViews)
    } else {
        None
    }
}

/// Broadcasts refresh notifications to dev clients.
///
/// Each connection holds its own receiver; a closed connection only drops
/// its receiver and never affects delivery to the others.
#[derive(Debug, Clone)]
pub struct RefreshHub {
    sender: broadcast::Sender<()>,
}

impl Default for RefreshHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshHub {
    /// Creates a hub with no connections.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Registers a connection.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Notifies every connection. Returns how many were reached.
    pub fn refresh(&self) -> usize {
        self.sender.send(()).unwrap_or(0)
    }

    /// Number of open connections.
    pub fn connections(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Reacts to change events by re-running affected subsystems.
pub struct HotReloadCoordinator {
    app: Arc<Sprig>,
    hub: RefreshHub,
}

impl HotReloadCoordinator {
    /// Creates a coordinator for `app`, notifying through `hub`.
    pub fn new(app: Arc<Sprig>, hub: RefreshHub) -> Self {
        Self { app, hub }
    }

    /// Handles a batch of events, then sends one refresh.
    ///
    /// Each affected area is reloaded once per batch. Returns the areas in
    /// the order they were handled.
    pub async fn handle_batch(&self, events: &[ChangeEvent]) -> Vec<ReloadArea> {
        let layout = &self.app.options().layout;
        let mut areas = Vec::new();
        for event in events {
            match classify(layout, &event.path) {
                Some(area) if !areas.contains(&area) => areas.push(area),
                Some(_) => {}
                None => debug!(path = %event.path, "Ignoring change outside watched directories"),
            }
        }

        for area in &areas {
            info!(area = ?area, "Reloading");
            match area {
                ReloadArea::ApiRoutes => {
                    self.app.register_api_routes();
                }
                ReloadArea::ViewMiddleware => {
                    self.app.register_backend_components();
                }
                ReloadArea::Stylesheets => {
                    self.app.build_css().await;
                }
                ReloadArea::FrontendViews => {
                    self.app.build_frontend().await;
                }
            }
        }

        let reached = self.hub.refresh();
        debug!(clients = reached, "Sent refresh");
        areas
    }

    /// Processes events until the channel closes.
    ///
    /// Events already queued behind the first one are handled in the same
    /// batch. Returns immediately outside development mode.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<ChangeEvent>) {
        if !self.app.options().dev {
            return;
        }

        while let Some(first) = rx.recv().await {
            let mut batch = vec![first];
            while let Ok(next) = rx.try_recv() {
                batch.push(next);
            }
            self.handle_batch(&batch).await;
        }
    }
}
