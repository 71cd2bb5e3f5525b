// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Framework options and the directory layout convention.
//!
//! All layout directories are relative to the project root and use `/`
//! as separator, matching the normalized registry keys.

use std::path::{Path, PathBuf};

/// Directory conventions for a Sprig project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Frontend view components (`.tsx`).
    pub frontend_components: String,
    /// Shared client scripts that feed the JS fingerprint (`.ts`, `.js`).
    pub frontend_files: String,
    /// Stylesheets concatenated into `app.css`.
    pub frontend_css: String,
    /// Backend view middleware (`.rs`).
    pub backend_components: String,
    /// API route registrars (`.rs`).
    pub backend_api: String,
    /// Static assets served under `/static`.
    pub static_dir: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            frontend_components: "app/frontend/components".to_string(),
            frontend_files: "app/frontend/files".to_string(),
            frontend_css: "app/frontend/css".to_string(),
            backend_components: "app/backend/components".to_string(),
            backend_api: "app/backend/api".to_string(),
            static_dir: "app/static".to_string(),
        }
    }
}

impl Layout {
    /// Registry key of the frontend view addressed by a url param.
    ///
    /// `checkout/cart` maps to `app/frontend/components/checkout/cart.tsx`.
    pub fn frontend_view_key(&self, url_param: &str) -> String {
        format!(
            "{}/{}.tsx",
            self.frontend_components,
            url_param.trim_matches('/')
        )
    }

    /// Registry key of the backend middleware addressed by a url param.
    pub fn backend_view_key(&self, url_param: &str) -> String {
        format!(
            "{}/{}.rs",
            self.backend_components,
            url_param.trim_matches('/')
        )
    }
}

/// Options the framework state is built from.
#[derive(Debug, Clone)]
pub struct SprigOptions {
    /// Project root every layout directory is resolved against.
    pub root: PathBuf,
    /// Development mode: unminified bundles, dev tools, stack traces.
    pub dev: bool,
    /// Document title used by full-page renders.
    pub title: String,
    /// Directory conventions.
    pub layout: Layout,
}

impl SprigOptions {
    /// Creates production options rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            dev: false,
            title: "Sprig App".to_string(),
            layout: Layout::default(),
        }
    }

    /// Sets development mode.
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the directory layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_keys_follow_layout() {
        let layout = Layout::default();
        assert_eq!(
            layout.frontend_view_key("checkout/cart"),
            "app/frontend/components/checkout/cart.tsx"
        );
        assert_eq!(
            layout.backend_view_key("/index/"),
            "app/backend/components/index.rs"
        );
    }
}
