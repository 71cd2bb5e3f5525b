// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server for sprig applications.
//!
//! This is a thin adapter that converts HTTP requests to a [`Context`],
//! calls [`Sprig::respond`] or [`Sprig::dispatch_api`], and converts the
//! resulting [`SprigResponse`] back to HTTP.
//!
//! | Route | Handler |
//! |---|---|
//! | `/` | `index` view as a page |
//! | `/pages/*` | view as a page |
//! | `/components/*` | view as a fragment |
//! | `/app.js`, `/app.css` | build artifacts |
//! | `/static/*` | files under the static directory |
//! | `/__sprig/livereload` | dev push channel (dev only) |
//! | anything else | API routes, then 404 |

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Request, State, WebSocketUpgrade},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sprig::reload::LIVERELOAD_PATH;
use sprig::{
    ArtifactKind, Context, Method, RefreshHub, RenderMode, ResponseBody, Sprig, SprigRequest,
    SprigResponse,
};
use tower_http::services::ServeDir;
use tracing::{debug, info};

use super::livereload::handle_websocket;

const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared state of the HTTP server.
pub struct AppState {
    /// The framework state.
    pub app: Arc<Sprig>,
    /// Refresh notifications for dev clients.
    pub hub: RefreshHub,
}

impl AppState {
    /// Creates server state for `app`.
    pub fn new(app: Arc<Sprig>, hub: RefreshHub) -> Self {
        Self { app, hub }
    }
}

/// Builds the axum router for `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let options = state.app.options();
    let static_dir = options.root.join(&options.layout.static_dir);

    let mut router = Router::new()
        .route("/", get(index_handler).post(index_handler))
        .route("/pages/*path", get(page_handler).post(page_handler))
        .route("/components/*path", get(component_handler).post(component_handler))
        .route("/app.js", get(js_handler))
        .route("/app.css", get(css_handler));

    if options.dev {
        router = router.route(LIVERELOAD_PATH, get(livereload_handler));
    }

    router
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Creates and starts the HTTP server.
pub async fn create_server(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    respond(&state, "", RenderMode::Page, request).await
}

async fn page_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    respond(&state, &path, RenderMode::Page, request).await
}

async fn component_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    respond(&state, &path, RenderMode::Fragment, request).await
}

async fn respond(state: &AppState, url_param: &str, mode: RenderMode, request: Request) -> Response {
    let mut ctx = match to_context(request).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    state.app.respond(&mut ctx, url_param, mode).await;
    into_axum(ctx.response)
}

async fn js_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_artifact(&state, ArtifactKind::Js)
}

async fn css_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_artifact(&state, ArtifactKind::Css)
}

// Builds happen at startup and on reload; requests only read the cache.
fn serve_artifact(state: &AppState, kind: ArtifactKind) -> Response {
    match state.app.asset(kind) {
        Some(bytes) => ([(header::CONTENT_TYPE, kind.content_type())], bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.hub.subscribe();
    ws.on_upgrade(move |socket| handle_websocket(socket, rx))
}

async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let mut ctx = match to_context(request).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if state.app.dispatch_api(&mut ctx).await {
        into_axum(ctx.response)
    } else {
        debug!(path = %ctx.request.path, "No route");
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Converts an axum request into a request context.
///
/// Bodies over 1 MiB are rejected with 413; unsupported methods with 405.
pub async fn to_context(request: Request) -> Result<Context, Response> {
    let (parts, body) = request.into_parts();

    let method: Method = parts
        .method
        .as_str()
        .parse()
        .map_err(|_| StatusCode::METHOD_NOT_ALLOWED.into_response())?;

    let mut sprig_request = SprigRequest::new(method, parts.uri.path())
        .with_query_string(parts.uri.query().unwrap_or_default());

    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            sprig_request = sprig_request.with_header(name.as_str(), value);
        }
    }

    if method != Method::Get && method != Method::Head {
        let bytes = axum::body::to_bytes(body, MAX_BODY_SIZE)
            .await
            .map_err(|_| (StatusCode::PAYLOAD_TOO_LARGE, "Body too large").into_response())?;
        if !bytes.is_empty() {
            sprig_request = sprig_request.with_body(bytes.to_vec());
        }
    }

    Ok(Context::new(sprig_request))
}

/// Converts a framework response into an axum response, streaming HTML
/// chunks as they were produced.
pub fn into_axum(response: SprigResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = match response.body {
        ResponseBody::Empty => Body::empty(),
        ResponseBody::Bytes(bytes) => Body::from(bytes),
        ResponseBody::Html(html) => Body::from_stream(html.into_stream()),
    };

    builder.body(body).unwrap_or_else(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response()
    })
}
