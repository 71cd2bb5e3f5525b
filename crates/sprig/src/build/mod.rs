// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Frontend asset builds.
//!
//! Two artifacts are produced: `app.js`, bundling every frontend view with
//! the client bootstrap, and `app.css`, concatenating every stylesheet.
//! Each is guarded by a fingerprint of its inputs; when the persisted
//! fingerprint matches, the persisted bytes are served without invoking the
//! bundler.

mod assets;
mod builder;
mod bundler;
mod entry;
mod fingerprint;

pub use assets::AssetCache;
pub use builder::AssetBuilder;
pub use bundler::{Bundler, JsBundleRequest, UnavailableBundler};
pub use entry::{concat_stylesheets, js_entry};
pub use fingerprint::fingerprint;

/// The two build artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The JavaScript bundle.
    Js,
    /// The CSS bundle.
    Css,
}

impl ArtifactKind {
    /// File name the artifact is served and persisted under.
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Js => "app.js",
            ArtifactKind::Css => "app.css",
        }
    }

    /// Persisted-cache key of the artifact's fingerprint.
    pub fn version_key(&self) -> &'static str {
        match self {
            ArtifactKind::Js => "js_version",
            ArtifactKind::Css => "css_version",
        }
    }

    /// Content type used when serving the artifact.
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Js => "text/javascript; charset=utf-8",
            ArtifactKind::Css => "text/css; charset=utf-8",
        }
    }
}

/// Outcome of a build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Served from the persisted cache.
    Loaded,
    /// Rebuilt and persisted.
    Built,
    /// The build failed; the previous artifact stays in place.
    Failed,
}
