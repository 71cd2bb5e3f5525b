// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! End-to-end tests of the request pipeline and build cache.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use sprig::kv::MemoryKVStore;
use sprig::render::decode_props;
use sprig::{
    view_fn, ApiRoutes, ArtifactKind, BuildStatus, Bundler, ChangeEvent, ChangeKind, Context, Error,
    HotReloadCoordinator, JsBundleRequest, Manifest, Method, Middleware, Next, Props, RefreshHub,
    RenderMode, Result, Sprig, SprigOptions, SprigRequest, SprigResponse, ViewMiddleware,
};
use tempfile::TempDir;
use tokio::sync::Semaphore;

#[derive(Default)]
struct MockBundler {
    js_calls: AtomicUsize,
    css_calls: AtomicUsize,
    fail: AtomicBool,
}

#[async_trait]
impl Bundler for MockBundler {
    async fn bundle_js(&self, request: JsBundleRequest) -> Result<Vec<u8>> {
        let n = self.js_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Bundle("mock failure".to_string()));
        }
        Ok(format!("// build {}\n{}", n, request.entry).into_bytes())
    }

    async fn minify_css(&self, css: String, _resolve_dir: PathBuf) -> Result<Vec<u8>> {
        let n = self.css_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Bundle("mock failure".to_string()));
        }
        Ok(format!("/*{}*/{}", n, css.replace('\n', "")).into_bytes())
    }
}

/// Holds every CSS build after the first until a permit is released.
struct GatedBundler {
    gate: Arc<Semaphore>,
    css_calls: AtomicUsize,
}

#[async_trait]
impl Bundler for GatedBundler {
    async fn bundle_js(&self, request: JsBundleRequest) -> Result<Vec<u8>> {
        Ok(request.entry.into_bytes())
    }

    async fn minify_css(&self, css: String, _resolve_dir: PathBuf) -> Result<Vec<u8>> {
        let n = self.css_calls.fetch_add(1, Ordering::SeqCst);
        if n > 0 {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| Error::Bundle(e.to_string()))?;
        }
        Ok(format!("/*{}*/{}", n, css.replace('\n', "")).into_bytes())
    }
}

struct RequireToken;

#[async_trait]
impl Middleware for RequireToken {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
        if ctx.request.query_param("token").is_none() {
            ctx.response = SprigResponse::redirect("/pages/index");
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
    routes.get("/api/hello", |ctx: &mut Context| -> Result<()> {
        ctx.response = SprigResponse::json(200, &json!({"hello": "world"}));
        Ok(())
    })
}

struct Project {
    _temp: TempDir,
    root: PathBuf,
    bundler: Arc<MockBundler>,
    store: Arc<MemoryKVStore>,
    after_seen: Arc<Mutex<Option<Props>>>,
}

impl Project {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        touch(&root, "app/frontend/components/index.tsx", "export default function Home() {}");
        touch(&root, "app/frontend/components/Counter.tsx", "export default function Counter() {}");
        touch(&root, "app/frontend/components/secret.tsx", "export default function Secret() {}");
        touch(&root, "app/frontend/css/app.css", "body { margin: 0; }");
        touch(&root, "app/backend/components/index.rs", "");
        touch(&root, "app/backend/components/secret.rs", "");
        touch(&root, "app/backend/api/hello.rs", "");

        Self {
            _temp: temp,
            root,
            bundler: Arc::new(MockBundler::default()),
            store: Arc::new(MemoryKVStore::new()),
            after_seen: Arc::new(Mutex::new(None)),
        }
    }

    fn manifest(&self) -> Manifest {
        let seen = self.after_seen.clone();
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
            .view("app/frontend/components/secret.tsx", || {
                view_fn("Secret", |_| Ok("<p>secret</p>".to_string()))
            })
            .middleware("app/backend/components/index.rs", move || {
                let seen = seen.clone();
                ViewMiddleware::new().after(move |_ctx: &Context, props: &Props| -> Result<()> {
                    *seen.lock().unwrap() = Some(props.clone());
                    Ok(())
                })
            })
            .middleware("app/backend/components/secret.rs", || {
                ViewMiddleware::new().before(RequireToken)
            })
            .api("app/backend/api/hello.rs", register_hello);
        manifest
    }

    fn app(&self, dev: bool) -> Sprig {
        let options = SprigOptions::new(&self.root).with_dev(dev).with_title("Pipeline");
        Sprig::new(options, self.manifest(), self.bundler.clone()).with_store(self.store.clone())
    }
}

fn body(ctx: &Context) -> String {
    String::from_utf8(ctx.response.body_bytes().to_vec()).unwrap()
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
async fn get_page_with_query_props() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;

    let request = SprigRequest::new(Method::Get, "/pages/index").with_query_string("a=1&b=2");
    let mut ctx = Context::new(request);
    app.respond(&mut ctx, "index", RenderMode::Page).await;

    let html = body(&ctx);
    assert_eq!(ctx.response.status, 200);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Pipeline</title>"));
    assert!(html.contains("<h1>Home 1</h1>"));
    assert_eq!(html.matches("startHydrate(").count(), 1);
    assert!(html.contains("startHydrate(\"Home\", \"#c"));
    assert_eq!(hydration_props(&html), props(json!({"a": "1", "b": "2"})));

    let seen = project.after_seen.lock().unwrap().clone();
    assert_eq!(seen, Some(props(json!({"a": "1", "b": "2"}))));
}

#[tokio::test]
async fn get_component_fragment() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;

    let mut ctx = Context::new(SprigRequest::new(Method::Get, "/components/Counter"));
    app.respond(&mut ctx, "Counter", RenderMode::Fragment).await;

    let html = body(&ctx);
    assert!(!html.contains("<html"));
    assert!(!html.contains("DOMContentLoaded"));
    assert_eq!(html.matches("class=\"sprig-component Counter\"").count(), 1);
    assert_eq!(html.matches("<script>startHydrate(\"Counter\"").count(), 1);
}

#[tokio::test]
async fn unknown_page_is_empty_not_found() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;

    let mut ctx = Context::new(SprigRequest::new(Method::Get, "/pages/doesNotExist"));
    app.respond(&mut ctx, "doesNotExist", RenderMode::Page).await;

    assert_eq!(ctx.response.status, 404);
    assert!(ctx.response.body_bytes().is_empty());
}

#[tokio::test]
async fn post_json_merges_body_over_query() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;

    let request = SprigRequest::new(Method::Post, "/pages/index")
        .with_query_string("y=6&x=query")
        .with_header("Content-Type", "application/json")
        .with_body(br#"{"x":5}"#.to_vec());
    let mut ctx = Context::new(request);
    app.respond(&mut ctx, "index", RenderMode::Page).await;

    assert_eq!(hydration_props(&body(&ctx)), props(json!({"y": "6", "x": 5})));
}

#[tokio::test]
async fn unparsable_body_still_renders_with_query_props() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;

    let request = SprigRequest::new(Method::Post, "/pages/index")
        .with_query_string("a=1")
        .with_header("Content-Type", "application/json")
        .with_body(b"{not json".to_vec());
    let mut ctx = Context::new(request);
    app.respond(&mut ctx, "index", RenderMode::Page).await;

    assert_eq!(ctx.response.status, 200);
    let html = body(&ctx);
    assert!(html.contains("<h1>Home 1</h1>"));
    assert_eq!(hydration_props(&html), props(json!({"a": "1"})));
}

#[tokio::test]
async fn short_circuit_skips_render() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;

    let mut ctx = Context::new(SprigRequest::new(Method::Get, "/pages/secret"));
    app.respond(&mut ctx, "secret", RenderMode::Page).await;
    assert_eq!(ctx.response.status, 302);
    assert_eq!(ctx.response.header("location"), Some("/pages/index"));
    assert!(ctx.response.body_bytes().is_empty());

    let request = SprigRequest::new(Method::Get, "/pages/secret").with_query_string("token=t");
    let mut ctx = Context::new(request);
    app.respond(&mut ctx, "secret", RenderMode::Page).await;
    assert_eq!(ctx.response.status, 200);
    assert!(body(&ctx).contains("<p>secret</p>"));
}

#[tokio::test]
async fn failed_css_rebuild_serves_stale_bytes() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;
    let stale = app.asset(ArtifactKind::Css).unwrap();

    touch(&project.root, "app/frontend/css/extra.css", "p { color: red; }");
    project.bundler.fail.store(true, Ordering::SeqCst);

    assert_eq!(app.build_css().await, BuildStatus::Failed);
    assert_eq!(app.asset(ArtifactKind::Css).unwrap(), stale);
}

#[tokio::test]
async fn assets_stay_readable_while_a_rebuild_is_pending() {
    let project = Project::new();
    let gate = Arc::new(Semaphore::new(0));
    let bundler = Arc::new(GatedBundler {
        gate: gate.clone(),
        css_calls: AtomicUsize::new(0),
    });
    let app = Arc::new(
        Sprig::new(SprigOptions::new(&project.root), project.manifest(), bundler.clone())
            .with_store(project.store.clone()),
    );
    app.init().await;
    let before = app.asset(ArtifactKind::Css).unwrap();

    touch(&project.root, "app/frontend/css/extra.css", "p { color: red; }");
    let rebuild = tokio::spawn({
        let app = app.clone();
        async move { app.build_css().await }
    });
    tokio::time::timeout(Duration::from_secs(5), async {
        while bundler.css_calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    // The bundler is parked; reads must not wait on it.
    assert_eq!(app.asset(ArtifactKind::Css).unwrap(), before);
    assert_eq!(app.asset(ArtifactKind::Css).unwrap(), before);
    assert_eq!(bundler.css_calls.load(Ordering::SeqCst), 2);

    gate.add_permits(1);
    assert_eq!(rebuild.await.unwrap(), BuildStatus::Built);
    assert_ne!(app.asset(ArtifactKind::Css).unwrap(), before);
}

#[tokio::test]
async fn unchanged_inputs_do_not_rebuild() {
    let project = Project::new();
    let first = project.app(false);
    first.init().await;
    let js = first.asset(ArtifactKind::Js).unwrap();
    assert_eq!(project.bundler.js_calls.load(Ordering::SeqCst), 1);

    let second = project.app(false);
    assert_eq!(second.build_frontend().await, BuildStatus::Loaded);
    assert_eq!(project.bundler.js_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.asset(ArtifactKind::Js).unwrap(), js);

    let entry = String::from_utf8(js.to_vec()).unwrap();
    assert!(entry.contains("components[\"Home\"]"));
    assert!(entry.contains("components[\"Counter\"]"));

    fs::File::options()
        .write(true)
        .open(project.root.join("app/frontend/components/Counter.tsx"))
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(120))
        .unwrap();
    assert_eq!(second.build_frontend().await, BuildStatus::Built);
    assert_eq!(project.bundler.js_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn dev_and_prod_use_separate_fingerprints() {
    let project = Project::new();
    project.app(false).build_frontend().await;
    assert_eq!(project.app(true).build_frontend().await, BuildStatus::Built);
    assert_eq!(project.bundler.js_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn api_routes_are_registered_on_load() {
    let project = Project::new();
    let app = project.app(false);
    app.init().await;

    let mut ctx = Context::new(SprigRequest::new(Method::Get, "/api/hello"));
    assert!(app.dispatch_api(&mut ctx).await);
    assert_eq!(body(&ctx), r#"{"hello":"world"}"#);
}

#[tokio::test]
async fn hot_reload_rescans_only_affected_area() {
    let project = Project::new();
    let app = Arc::new(project.app(true));
    app.init().await;

    let hub = RefreshHub::new();
    let mut client = hub.subscribe();
    let coordinator = HotReloadCoordinator::new(app.clone(), hub.clone());

    fs::remove_file(project.root.join("app/frontend/components/Counter.tsx")).unwrap();
    let areas = coordinator
        .handle_batch(&[
            ChangeEvent::new(ChangeKind::Removed, "app/frontend/components/Counter.tsx"),
            ChangeEvent::new(ChangeKind::Modified, "app/frontend/components/index.tsx"),
        ])
        .await;

    assert_eq!(areas, vec![sprig::ReloadArea::FrontendViews]);
    assert!(app.view("Counter").is_none());
    assert!(client.recv().await.is_ok());
    assert_eq!(project.bundler.css_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn coordinator_is_inert_outside_dev() {
    let project = Project::new();
    let app = Arc::new(project.app(false));
    let hub = RefreshHub::new();
    let mut client = hub.subscribe();

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tx.send(ChangeEvent::new(ChangeKind::Modified, "app/frontend/css/app.css"))
        .unwrap();
    HotReloadCoordinator::new(app, hub).run(rx).await;

    assert!(client.try_recv().is_err());
}
