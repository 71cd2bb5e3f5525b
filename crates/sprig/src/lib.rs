// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # Sprig
//!
//! Convention-over-configuration server-side rendering core.
//!
//! Sprig discovers views and backend handlers from directory conventions,
//! compiles one JavaScript and one CSS bundle with a persisted-cache
//! short-circuit, renders views to streamed HTML, and embeds a hydration
//! instruction so the browser can attach the matching client component.
//!
//! ## Features
//!
//! - Three module registries diffed on every rescan
//! - Fingerprinted bundle cache backed by any [`kv::KVStore`]
//! - Page and fragment rendering with `startHydrate(...)` scripts
//! - Before/after middleware per view with short-circuit detection
//! - Hot-reload coordinator driven by typed change events
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sprig::{Manifest, Sprig, SprigOptions, view_fn};
//!
//! let mut manifest = Manifest::new();
//! manifest.view("app/frontend/components/index.tsx", || {
//!     view_fn("Home", |_props| Ok("<h1>Hello</h1>".to_string()))
//! });
//!
//! let app = Sprig::new(SprigOptions::new("."), manifest, bundler);
//! app.init().await;
//! ```

/// Registered API routes populated by registrar modules.
pub mod api;
/// The framework state object tying every subsystem together.
pub mod app;
/// Frontend asset builds: fingerprints, bundler adapter, artifact cache.
pub mod build;
/// Embedded client-side scripts.
pub mod client;
/// Build-script generation of the module manifest.
pub mod codegen;
/// Framework options and directory layout.
pub mod config;
/// Per-request context passed through middleware and handlers.
pub mod context;
/// Error types.
pub mod error;
/// HTML helpers.
pub mod html;
/// Key-Value store abstraction used by the persisted build cache.
pub mod kv;
/// Mapping from discovered paths to module factories.
pub mod manifest;
/// View middleware chains.
pub mod middleware;
/// Request-to-props extraction.
pub mod props;
/// Module discovery and registries.
pub mod registry;
/// Hot-reload coordination for development mode.
pub mod reload;
/// Server-side rendering of pages and fragments.
pub mod render;
/// HTTP request abstraction.
pub mod request;
/// HTTP response abstraction.
pub mod response;
/// The view rendering contract.
pub mod view;

pub use api::{handler_fn, ApiRegistrar, ApiRoutes, Handler};
pub use app::Sprig;
pub use build::{ArtifactKind, AssetBuilder, BuildStatus, Bundler, JsBundleRequest, UnavailableBundler};
pub use config::{Layout, SprigOptions};
pub use context::Context;
pub use error::{Error, Result};
pub use manifest::Manifest;
pub use middleware::{AfterHandler, Middleware, Next, ViewMiddleware};
pub use registry::{ModuleKind, Registry, RescanReport};
pub use reload::{ChangeEvent, ChangeKind, HotReloadCoordinator, RefreshHub, ReloadArea};
pub use render::{HtmlStream, PageMeta, RenderMode};
pub use request::{Method, SprigRequest};
pub use response::{ResponseBody, SprigResponse};
pub use view::{view_fn, Props, View};
