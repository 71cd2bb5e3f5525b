// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Tests of the HTTP adapter against the real router.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value as JsonValue};
use sprig::render::decode_props;
use sprig::{
    view_fn, ApiRoutes, BuildStatus, Bundler, Context, Error, JsBundleRequest, Manifest, Middleware,
    Next, Props, RefreshHub, Result, Sprig, SprigOptions, SprigResponse, ViewMiddleware,
};
use sprig_cli::kv::SqliteKVStore;
use sprig_cli::server::{router, AppState};
use tempfile::TempDir;

#[derive(Default)]
struct MockBundler {
    css_calls: AtomicUsize,
    fail: AtomicBool,
}

#[async_trait]
impl Bundler for MockBundler {
    async fn bundle_js(&self, request: JsBundleRequest) -> Result<Vec<u8>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Bundle("mock failure".to_string()));
        }
        Ok(request.entry.into_bytes())
    }

    async fn minify_css(&self, css: String, _resolve_dir: PathBuf) -> Result<Vec<u8>> {
        let n = self.css_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Bundle("mock failure".to_string()));
        }
        Ok(format!("/*{}*/{}", n, css.replace('\n', "")).into_bytes())
    }
}

struct RequireLogin;

#[async_trait]
impl Middleware for RequireLogin {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
        if ctx.request.header("x-user").is_none() {
            ctx.response = SprigResponse::redirect("/");
            return Ok(());
        }
        next.run(ctx).await
    }
}

fn touch(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn register_hello(routes: &ApiRoutes) -> Result<()> {
    routes.get("/api/hello/{name}", |ctx: &mut Context| -> Result<()> {
        let name = ctx.param("name").unwrap_or_default().to_string();
        ctx.response = SprigResponse::json(200, &json!({ "hello": name }));
        Ok(())
    })
}

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
    app: Arc<Sprig>,
    bundler: Arc<MockBundler>,
    server: TestServer,
}

fn manifest() -> Manifest {
    let mut manifest = Manifest::new();
    manifest
        .view("app/frontend/components/index.tsx", || {
            view_fn("Home", |props| {
                Ok(format!("<h1>Home {}</h1>", sprig::html::prop_text(props, "a")))
            })
        })
        .view("app/frontend/components/Counter.tsx", || {
            view_fn("Counter", |_| Ok("<button>0</button>".to_string()))
        })
        .view("app/frontend/components/account.tsx", || {
            view_fn("Account", |_| Ok("<p>account</p>".to_string()))
        })
        .middleware("app/backend/components/account.rs", || {
            ViewMiddleware::new().before(RequireLogin)
        })
        .api("app/backend/api/hello.rs", register_hello);
    manifest
}

async fn fixture(dev: bool) -> Fixture {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    touch(&root, "app/frontend/components/index.tsx", "");
    touch(&root, "app/frontend/components/Counter.tsx", "");
    touch(&root, "app/frontend/components/account.tsx", "");
    touch(&root, "app/frontend/css/app.css", "body { margin: 0; }");
    touch(&root, "app/backend/components/account.rs", "");
    touch(&root, "app/backend/api/hello.rs", "");
    touch(&root, "app/static/robots.txt", "User-agent: *");

    let bundler = Arc::new(MockBundler::default());
    let store = Arc::new(SqliteKVStore::in_memory("build").unwrap());
    let options = SprigOptions::new(&root).with_dev(dev).with_title("Integration");
    let app = Arc::new(Sprig::new(options, manifest(), bundler.clone()).with_store(store));
    app.init().await;

    let state = Arc::new(AppState::new(app.clone(), RefreshHub::new()));
    let server = TestServer::new(router(state)).unwrap();
    Fixture {
        _temp: temp,
        root,
        app,
        bundler,
        server,
    }
}

fn hydration_props(html: &str) -> Props {
    let marker = "decodeProps(\"";
    let start = html.find(marker).unwrap() + marker.len();
    let end = start + html[start..].find('"').unwrap();
    decode_props(&html[start..end]).unwrap()
}

fn props(value: JsonValue) -> Props {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn root_serves_index_page_with_query_props() {
    let f = fixture(false).await;
    let response = f
        .server
        .get("/")
        .add_query_param("a", "1")
        .add_query_param("b", "2")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "text/html; charset=utf-8");
    let html = response.text();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Integration</title>"));
    assert!(html.contains("<h1>Home 1</h1>"));
    assert!(!html.contains("startDevTools"));
    assert_eq!(hydration_props(&html), props(json!({"a": "1", "b": "2"})));
}

#[tokio::test]
async fn component_route_renders_fragment() {
    let f = fixture(false).await;
    let html = f.server.get("/components/Counter").await.text();

    assert!(!html.contains("<html"));
    assert!(html.contains("class=\"sprig-component Counter\""));
    assert_eq!(html.matches("startHydrate(\"Counter\"").count(), 1);
}

#[tokio::test]
async fn unknown_page_is_404_with_empty_body() {
    let f = fixture(false).await;
    let response = f.server.get("/pages/doesNotExist").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn post_json_body_wins_over_query() {
    let f = fixture(false).await;
    let html = f
        .server
        .post("/pages/index")
        .add_query_param("x", "query")
        .add_query_param("y", "6")
        .json(&json!({"x": 5}))
        .await
        .text();

    assert_eq!(hydration_props(&html), props(json!({"x": 5, "y": "6"})));
}

#[tokio::test]
async fn post_form_route_helper_is_whole_body() {
    let f = fixture(false).await;
    let html = f
        .server
        .post("/pages/index")
        .form(&[("faster_react_route_helper", r#"{"nested":{"n":[1,2]}}"#)])
        .await
        .text();

    assert_eq!(hydration_props(&html), props(json!({"nested": {"n": [1, 2]}})));
}

#[tokio::test]
async fn post_form_repeated_fields_become_arrays() {
    let f = fixture(false).await;
    let html = f
        .server
        .post("/components/index")
        .form(&[("tag", "a"), ("tag", "b"), ("q", "x")])
        .await
        .text();

    assert_eq!(hydration_props(&html), props(json!({"tag": ["a", "b"], "q": "x"})));
}

#[tokio::test]
async fn middleware_short_circuit_redirects() {
    let f = fixture(false).await;
    let response = f.server.get("/pages/account").await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "/");
    assert!(response.text().is_empty());

    let response = f
        .server
        .get("/pages/account")
        .add_header(HeaderName::from_static("x-user"), HeaderValue::from_static("ada"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<p>account</p>"));
}

#[tokio::test]
async fn artifacts_are_served_with_content_types() {
    let f = fixture(false).await;

    let js = f.server.get("/app.js").await;
    assert_eq!(js.status_code(), StatusCode::OK);
    assert_eq!(js.header("content-type"), "text/javascript; charset=utf-8");
    assert!(js.text().contains("components[\"Counter\"]"));

    let css = f.server.get("/app.css").await;
    assert_eq!(css.header("content-type"), "text/css; charset=utf-8");
    assert!(css.text().contains("body { margin: 0; }"));
    assert_eq!(f.bundler.css_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_css_rebuild_keeps_serving_previous_bytes() {
    let f = fixture(false).await;
    let before = f.server.get("/app.css").await.text();

    touch(&f.root, "app/frontend/css/extra.css", "p { color: red; }");
    f.bundler.fail.store(true, Ordering::SeqCst);
    assert_eq!(f.app.build_css().await, BuildStatus::Failed);

    let after = f.server.get("/app.css").await;
    assert_eq!(after.status_code(), StatusCode::OK);
    assert_eq!(after.text(), before);
}

#[tokio::test]
async fn artifact_requests_never_invoke_the_bundler() {
    let f = fixture(false).await;
    let before = f.server.get("/app.css").await.text();
    touch(&f.root, "app/frontend/css/extra.css", "p { color: red; }");

    for _ in 0..3 {
        assert_eq!(f.server.get("/app.css").await.text(), before);
    }
    assert_eq!(f.bundler.css_calls.load(Ordering::SeqCst), 1);

    assert_eq!(f.app.build_css().await, BuildStatus::Built);
    assert_ne!(f.server.get("/app.css").await.text(), before);
    assert_eq!(f.bundler.css_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn never_built_artifact_is_404() {
    let temp = TempDir::new().unwrap();
    let bundler = Arc::new(MockBundler::default());
    bundler.fail.store(true, Ordering::SeqCst);
    let app = Arc::new(Sprig::new(SprigOptions::new(temp.path()), Manifest::new(), bundler));

    let server = TestServer::new(router(Arc::new(AppState::new(app, RefreshHub::new())))).unwrap();
    assert_eq!(server.get("/app.js").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_routes_and_static_files_fall_through() {
    let f = fixture(false).await;

    let response = f.server.get("/api/hello/sprig").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<JsonValue>(), json!({"hello": "sprig"}));

    assert_eq!(f.server.get("/static/robots.txt").await.text(), "User-agent: *");
    assert_eq!(f.server.get("/nothing/here").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn push_channel_exists_only_in_dev() {
    let prod = fixture(false).await;
    assert_eq!(
        prod.server.get("/__sprig/livereload").await.status_code(),
        StatusCode::NOT_FOUND
    );

    let dev = fixture(true).await;
    assert_ne!(
        dev.server.get("/__sprig/livereload").await.status_code(),
        StatusCode::NOT_FOUND
    );
    let html = dev.server.get("/").await.text();
    assert!(html.contains("startDevTools()"));
}
