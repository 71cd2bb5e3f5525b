// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Registered API routes.
//!
//! API registrar modules attach routes to [`ApiRoutes`] when they are
//! loaded. Patterns use matchit syntax: `{param}` for a segment and
//! `{*rest}` for a catch-all.
//!
//! ```rust
//! use sprig::{ApiRoutes, Context, SprigResponse};
//!
//! let routes = ApiRoutes::new();
//! routes
//!     .get("/api/hello/{name}", |ctx: &mut Context| -> sprig::Result<()> {
//!         let name = ctx.param("name").unwrap_or("world").to_string();
//!         ctx.response = SprigResponse::text(200, format!("hello {}", name));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert!(routes.find(sprig::Method::Get, "/api/hello/sprig").is_some());
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::request::Method;

/// An API request handler.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handles the request by mutating `ctx.response`.
    async fn call(&self, ctx: &mut Context) -> Result<()>;
}

#[async_trait]
impl<F> Handler for F
where
    F: Fn(&mut Context) -> Result<()> + Send + Sync,
{
    async fn call(&self, ctx: &mut Context) -> Result<()> {
        self(ctx)
    }
}

/// A [`Handler`] backed by an async closure. See [`handler_fn`].
pub struct AsyncHandler<F> {
    f: F,
}

/// Adapts an async closure taking and returning the context.
///
/// ```rust,ignore
/// routes.post("/api/echo", handler_fn(|mut ctx: Context| async move {
///     let body = ctx.request.body.clone().unwrap_or_default();
///     ctx.response = SprigResponse::text(200, String::from_utf8_lossy(&body));
///     Ok(ctx)
/// }))?;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> AsyncHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Context>> + Send + 'static,
{
    AsyncHandler { f }
}

#[async_trait]
impl<F, Fut> Handler for AsyncHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Context>> + Send + 'static,
{
    async fn call(&self, ctx: &mut Context) -> Result<()> {
        *ctx = (self.f)(ctx.clone()).await?;
        Ok(())
    }
}

/// A module that attaches routes when loaded.
pub trait ApiRegistrar: Send + Sync {
    /// Registers this module's routes.
    fn register(&self, routes: &ApiRoutes) -> Result<()>;
}

impl<F> ApiRegistrar for F
where
    F: Fn(&ApiRoutes) -> Result<()> + Send + Sync,
{
    fn register(&self, routes: &ApiRoutes) -> Result<()> {
        self(routes)
    }
}

#[derive(Default)]
struct RouteTable {
    handlers: HashMap<(Method, String), Arc<dyn Handler>>,
    matchers: HashMap<Method, matchit::Router<String>>,
}

/// Runtime route table populated by API registrars.
#[derive(Default)]
pub struct ApiRoutes {
    table: RwLock<RouteTable>,
}

impl ApiRoutes {
    /// Creates an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `pattern`.
    ///
    /// Registering an existing method and pattern replaces its handler.
    pub fn register<H>(&self, method: Method, pattern: &str, handler: H) -> Result<()>
    where
        H: Handler + 'static,
    {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let key = (method, pattern.to_string());

        if !table.handlers.contains_key(&key) {
            let matcher = table
                .matchers
                .entry(method)
                .or_insert_with(matchit::Router::new);
            matcher
                .insert(pattern, pattern.to_string())
                .map_err(|e| Error::Route(format!("{} {}: {}", method, pattern, e)))?;
        }

        table.handlers.insert(key, Arc::new(handler));
        debug!(method = %method, pattern, "Registered API route");
        Ok(())
    }

    /// Registers a GET handler.
    pub fn get<H: Handler + 'static>(&self, pattern: &str, handler: H) -> Result<()> {
        self.register(Method::Get, pattern, handler)
    }

    /// Registers a POST handler.
    pub fn post<H: Handler + 'static>(&self, pattern: &str, handler: H) -> Result<()> {
        self.register(Method::Post, pattern, handler)
    }

    /// Finds the handler for a request path, with captured parameters.
    pub fn find(&self, method: Method, path: &str) -> Option<(Arc<dyn Handler>, HashMap<String, String>)> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        let matched = table.matchers.get(&method)?.at(path).ok()?;
        let handler = table
            .handlers
            .get(&(method, matched.value.clone()))?
            .clone();
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Some((handler, params))
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .len()
    }

    /// Returns true if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
