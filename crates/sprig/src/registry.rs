// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Module discovery and registries.
//!
//! A [`Registry`] holds the loaded modules of one [`ModuleKind`], keyed by
//! normalized path (relative to the project root, `/` separated). A rescan
//! walks the kind's directory and diffs the result against the registry:
//!
//! - paths no longer on disk are deregistered,
//! - new paths are loaded and registered,
//! - paths already registered are left alone.
//!
//! A failing load is logged and skipped; the rest of the scan proceeds.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, warn};

use crate::config::Layout;
use crate::error::Result;

/// The three kinds of discovered modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Frontend view components.
    FrontendView,
    /// Backend view middleware.
    ViewMiddleware,
    /// API route registrars.
    ApiRegistrar,
}

impl ModuleKind {
    /// Directory scanned for this kind.
    pub fn dir<'a>(&self, layout: &'a Layout) -> &'a str {
        match self {
            ModuleKind::FrontendView => &layout.frontend_components,
            ModuleKind::ViewMiddleware => &layout.backend_components,
            ModuleKind::ApiRegistrar => &layout.backend_api,
        }
    }

    /// File extension matched for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ModuleKind::FrontendView => "tsx",
            ModuleKind::ViewMiddleware | ModuleKind::ApiRegistrar => "rs",
        }
    }

    /// Human-readable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ModuleKind::FrontendView => "frontend view",
            ModuleKind::ViewMiddleware => "view middleware",
            ModuleKind::ApiRegistrar => "api registrar",
        }
    }
}

/// Outcome of one rescan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RescanReport {
    /// Paths loaded and registered by this scan.
    pub added: Vec<String>,
    /// Paths deregistered because their file disappeared.
    pub removed: Vec<String>,
    /// Paths whose load failed.
    pub failed: Vec<String>,
}

impl RescanReport {
    /// Returns true if the registry changed.
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Loaded modules of one kind, keyed by normalized path.
pub struct Registry<T> {
    kind: ModuleKind,
    entries: RwLock<BTreeMap<String, T>>,
}

impl<T: Clone> Registry<T> {
    /// Creates an empty registry.
    pub fn new(kind: ModuleKind) -> Self {
        Self {
            kind,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// The kind of module held.
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// Walks the kind's directory under `root` and applies the diff.
    pub fn rescan<F>(&self, root: &Path, layout: &Layout, load: F) -> RescanReport
    where
        F: FnMut(&str) -> Result<T>,
    {
        let found = discover(root, self.kind.dir(layout), &[self.kind.extension()]);
        self.apply(&found, load)
    }

    /// Diffs the registry against `found` paths.
    ///
    /// `load` is called once for each path not yet registered.
    pub fn apply<F>(&self, found: &[String], mut load: F) -> RescanReport
    where
        F: FnMut(&str) -> Result<T>,
    {
        let found: BTreeSet<&str> = found.iter().map(|s| s.as_str()).collect();
        let mut report = RescanReport::default();
        let mut entries = self.write();

        let stale: Vec<String> = entries
            .keys()
            .filter(|key| !found.contains(key.as_str()))
            .cloned()
            .collect();
        for key in stale {
            entries.remove(&key);
            debug!(kind = self.kind.label(), path = %key, "Deregistered module");
            report.removed.push(key);
        }

        for path in found {
            if entries.contains_key(path) {
                continue;
            }
            match load(path) {
                Ok(module) => {
                    entries.insert(path.to_string(), module);
                    debug!(kind = self.kind.label(), path, "Registered module");
                    report.added.push(path.to_string());
                }
                Err(err) => {
                    error!(kind = self.kind.label(), path, error = %err, "Failed to load module");
                    report.failed.push(path.to_string());
                }
            }
        }

        report
    }

    /// Registers a module unless the path is already present.
    ///
    /// Returns true if the module was inserted.
    pub fn register(&self, path: impl Into<String>, module: T) -> bool {
        let path = path.into();
        let mut entries = self.write();
        if entries.contains_key(&path) {
            return false;
        }
        entries.insert(path, module);
        true
    }

    /// Removes a module, returning it if it was registered.
    pub fn deregister(&self, path: &str) -> Option<T> {
        self.write().remove(path)
    }

    /// Gets a module by normalized path.
    pub fn get(&self, path: &str) -> Option<T> {
        self.read().get(path).cloned()
    }

    /// Returns true if the path is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.read().contains_key(path)
    }

    /// Registered paths in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Snapshot of all entries in path order.
    pub fn entries(&self) -> Vec<(String, T)> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, T>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, T>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Finds files under `root/dir` with any of `extensions`.
///
/// Returns normalized paths relative to `root`, sorted and deduplicated.
/// A missing directory yields an empty list.
pub fn discover(root: &Path, dir: &str, extensions: &[&str]) -> Vec<String> {
    let base = root.join(dir);
    if !base.is_dir() {
        return Vec::new();
    }

    let prefix = glob::Pattern::escape(&base.to_string_lossy());
    let mut found = BTreeSet::new();

    for ext in extensions {
        let pattern = format!("{}/**/*.{}", prefix, ext);
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(err) => {
                warn!(pattern = %pattern, error = %err, "Invalid discovery pattern");
                continue;
            }
        };

        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    if let Ok(relative) = path.strip_prefix(root) {
                        found.insert(normalize_path(relative));
                    }
                }
                Ok(_) => {}
                Err(err) => warn!(error = %err, "Unreadable path during discovery"),
            }
        }
    }

    found.into_iter().collect()
}

/// Joins the normal components of `path` with `/`.
pub fn normalize_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
