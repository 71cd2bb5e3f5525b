// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The framework state object.
//!
//! [`Sprig`] owns the three registries, the API route table and the asset
//! builder. HTTP adapters share it behind an `Arc` and call
//! [`respond`](Sprig::respond) for view routes and
//! [`dispatch_api`](Sprig::dispatch_api) for everything else.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info};

use crate::api::{ApiRegistrar, ApiRoutes};
use crate::build::{ArtifactKind, AssetBuilder, BuildStatus, Bundler};
use crate::config::SprigOptions;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::kv::KVStore;
use crate::manifest::Manifest;
use crate::middleware::ViewMiddleware;
use crate::props::request_props;
use crate::registry::{ModuleKind, Registry, RescanReport};
use crate::render::{error_props, render, ErrorView, PageMeta, RenderMode};
use crate::response::{ResponseBody, SprigResponse, HTML_CONTENT_TYPE};
use crate::view::View;

/// Url param served at `/`.
pub const INDEX_VIEW: &str = "index";

/// Framework state shared by every request and build trigger.
pub struct Sprig {
    options: SprigOptions,
    manifest: Manifest,
    views: Registry<Arc<dyn View>>,
    middleware: Registry<ViewMiddleware>,
    apis: Registry<Arc<dyn ApiRegistrar>>,
    routes: ApiRoutes,
    builder: AssetBuilder,
}

impl Sprig {
    /// Creates the framework state. Nothing is scanned or built yet.
    pub fn new(options: SprigOptions, manifest: Manifest, bundler: Arc<dyn Bundler>) -> Self {
        let builder = AssetBuilder::new(
            options.root.clone(),
            options.layout.clone(),
            options.dev,
            bundler,
        );
        Self {
            options,
            manifest,
            views: Registry::new(ModuleKind::FrontendView),
            middleware: Registry::new(ModuleKind::ViewMiddleware),
            apis: Registry::new(ModuleKind::ApiRegistrar),
            routes: ApiRoutes::new(),
            builder,
        }
    }

    /// Persists build artifacts in `store`.
    pub fn with_store(mut self, store: Arc<dyn KVStore>) -> Self {
        self.builder = self.builder.with_store(store);
        self
    }

    /// Framework options.
    pub fn options(&self) -> &SprigOptions {
        &self.options
    }

    /// Registered API routes.
    pub fn routes(&self) -> &ApiRoutes {
        &self.routes
    }

    /// Metadata passed to page rendering.
    pub fn page_meta(&self) -> PageMeta {
        PageMeta::new(self.options.title.clone()).with_dev(self.options.dev)
    }

    /// Scans every module kind and builds both artifacts.
    pub async fn init(&self) {
        self.build_frontend().await;
        self.build_css().await;
        self.register_backend_components();
        self.register_api_routes();
        info!(
            views = self.views.len(),
            middleware = self.middleware.len(),
            api_routes = self.routes.len(),
            dev = self.options.dev,
            "Sprig initialized"
        );
    }

    /// Rescans frontend views.
    pub fn scan_views(&self) -> RescanReport {
        self.views.rescan(&self.options.root, &self.options.layout, |path| {
            self.manifest.load_view(path)
        })
    }

    /// Rescans frontend views, then loads or rebuilds `app.js`.
    pub async fn build_frontend(&self) -> BuildStatus {
        self.scan_views();
        let views: Vec<(String, String)> = self
            .views
            .entries()
            .into_iter()
            .map(|(path, view)| (path, view.name().to_string()))
            .collect();
        self.builder.build_js(&views).await
    }

    /// Loads or rebuilds `app.css`.
    pub async fn build_css(&self) -> BuildStatus {
        self.builder.build_css().await
    }

    /// Rescans backend view middleware, sealing each loaded chain.
    pub fn register_backend_components(&self) -> RescanReport {
        self.middleware
            .rescan(&self.options.root, &self.options.layout, |path| {
                self.manifest.load_middleware(path).map(ViewMiddleware::seal)
            })
    }

    /// Rescans API registrars. Each newly loaded registrar attaches its
    /// routes immediately.
    pub fn register_api_routes(&self) -> RescanReport {
        self.apis.rescan(&self.options.root, &self.options.layout, |path| {
            let registrar = self.manifest.load_api(path)?;
            registrar.register(&self.routes)?;
            Ok(registrar)
        })
    }

    /// The served bytes of `kind`.
    ///
    /// Never builds: a rebuild in progress keeps serving the previous bytes.
    pub fn asset(&self, kind: ArtifactKind) -> Option<Bytes> {
        self.builder.asset(kind)
    }

    /// The registered view addressed by `url_param`. Empty maps to `index`.
    pub fn view(&self, url_param: &str) -> Option<Arc<dyn View>> {
        self.views
            .get(&self.options.layout.frontend_view_key(view_param(url_param)))
    }

    /// Runs the view pipeline for `url_param`, leaving the outcome in
    /// `ctx.response`.
    ///
    /// Unknown views yield an empty 404. Middleware, props or render errors
    /// are rendered through the error view with status 500.
    pub async fn respond(&self, ctx: &mut Context, url_param: &str, mode: RenderMode) {
        let Some(view) = self.view(url_param) else {
            ctx.response = SprigResponse::not_found();
            return;
        };

        let meta = self.page_meta();
        if let Err(err) = self.run_view(ctx, url_param, view.as_ref(), mode, &meta).await {
            self.render_error(ctx, &err, mode, &meta);
        }
    }

    async fn run_view(
        &self,
        ctx: &mut Context,
        url_param: &str,
        view: &dyn View,
        mode: RenderMode,
        meta: &PageMeta,
    ) -> Result<()> {
        let middleware = self
            .middleware
            .get(&self.options.layout.backend_view_key(view_param(url_param)));

        if let Some(middleware) = &middleware {
            if !middleware.run_before(ctx).await? {
                return Ok(());
            }
        }

        let props = request_props(&ctx.request);
        if let Some(after) = middleware.as_ref().and_then(|m| m.after_handler()) {
            after.after(ctx, &props).await?;
        }

        let html = render(view, &props, mode, meta)?;
        ctx.response.set_header("content-type", HTML_CONTENT_TYPE);
        ctx.response.body = ResponseBody::Html(html);
        Ok(())
    }

    fn render_error(&self, ctx: &mut Context, err: &Error, mode: RenderMode, meta: &PageMeta) {
        error!(path = %ctx.request.path, error = %err, "Request failed");
        let props = error_props(err, self.options.dev);
        ctx.response = match render(&ErrorView, &props, mode, meta) {
            Ok(html) => SprigResponse::html(html).with_status(500),
            Err(secondary) => {
                error!(path = %ctx.request.path, error = %secondary, "Error view failed");
                SprigResponse::text(500, "Internal Server Error")
            }
        };
    }

    /// Runs the API handler matching the request, if any.
    ///
    /// Returns false when no route matches. Handler errors become a plain
    /// 500 response.
    pub async fn dispatch_api(&self, ctx: &mut Context) -> bool {
        let Some((handler, params)) = self.routes.find(ctx.request.method, &ctx.request.path) else {
            return false;
        };
        ctx.params = params;
        if let Err(err) = handler.call(ctx).await {
            error!(path = %ctx.request.path, error = %err, "API handler failed");
            ctx.response = SprigResponse::text(500, "Internal Server Error");
        }
        true
    }
}

fn view_param(url_param: &str) -> &str {
    match url_param.trim_matches('/') {
        "" => INDEX_VIEW,
        param => param,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::UnavailableBundler;
    use crate::middleware::{Middleware, Next};
    use crate::request::{Method, SprigRequest};
    use crate::view::view_fn;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct SetHeader;

    #[async_trait]
    impl Middleware for SetHeader {
        async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
            ctx.response.set_header("x-visited", "yes");
            next.run(ctx).await
        }
    }

    struct Fails;

    #[async_trait]
    impl Middleware for Fails {
        async fn handle(&self, _ctx: &mut Context, _next: Next<'_>) -> Result<()> {
            Err(Error::handler("session store down"))
        }
    }

    fn app(dev: bool) -> (TempDir, Sprig) {
        let temp = TempDir::new().unwrap();
        for rel in [
            "app/frontend/components/index.tsx",
            "app/frontend/components/about.tsx",
            "app/frontend/components/broken.tsx",
            "app/backend/components/about.rs",
            "app/backend/components/broken.rs",
        ] {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }

        let mut manifest = Manifest::new();
        manifest
            .view("app/frontend/components/index.tsx", || {
                view_fn("Home", |_| Ok("<h1>Home</h1>".to_string()))
            })
            .view("app/frontend/components/about.tsx", || {
                view_fn("About", |_| Ok("<p>About</p>".to_string()))
            })
            .view("app/frontend/components/broken.tsx", || {
                view_fn("Broken", |_| Ok(String::new()))
            })
            .middleware("app/backend/components/about.rs", || {
                ViewMiddleware::new().before(SetHeader)
            })
            .middleware("app/backend/components/broken.rs", || {
                ViewMiddleware::new().before(Fails)
            });

        let options = SprigOptions::new(temp.path()).with_dev(dev).with_title("Test");
        let sprig = Sprig::new(options, manifest, Arc::new(UnavailableBundler::new("no bundler")));
        (temp, sprig)
    }

    fn get(path: &str) -> Context {
        Context::new(SprigRequest::new(Method::Get, path))
    }

    #[tokio::test]
    async fn test_root_maps_to_index() {
        let (_temp, sprig) = app(false);
        sprig.init().await;

        let mut ctx = get("/");
        sprig.respond(&mut ctx, "", RenderMode::Page).await;
        assert_eq!(ctx.response.status, 200);
        assert!(ctx.response.body_bytes().starts_with(b"<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_middleware_headers_survive_render() {
        let (_temp, sprig) = app(false);
        sprig.init().await;

        let mut ctx = get("/pages/about");
        sprig.respond(&mut ctx, "about", RenderMode::Page).await;
        assert_eq!(ctx.response.header("x-visited"), Some("yes"));
        assert_eq!(ctx.response.header("content-type"), Some(HTML_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_middleware_error_renders_error_view() {
        let (_temp, sprig) = app(false);
        sprig.init().await;

        let mut ctx = get("/components/broken");
        sprig.respond(&mut ctx, "broken", RenderMode::Fragment).await;
        assert_eq!(ctx.response.status, 500);

        let html = String::from_utf8(ctx.response.body_bytes().to_vec()).unwrap();
        assert!(html.contains("class=\"sprig-component FrameworkErrorPage\""));
        assert!(html.contains("session store down"));
        assert!(!html.contains("<html"));
    }

    #[tokio::test]
    async fn test_failed_build_leaves_no_asset() {
        let (_temp, sprig) = app(false);
        assert_eq!(sprig.build_frontend().await, BuildStatus::Failed);
        assert!(sprig.asset(ArtifactKind::Js).is_none());
        assert_eq!(sprig.view("index").map(|v| v.name().to_string()).as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn test_unmatched_api_is_not_dispatched() {
        let (_temp, sprig) = app(false);
        let mut ctx = get("/api/nothing");
        assert!(!sprig.dispatch_api(&mut ctx).await);
    }
}
