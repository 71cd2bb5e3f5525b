// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! View middleware chains.
//!
//! A backend view component is a [`ViewMiddleware`]: an ordered list of
//! before-handlers and an optional after-handler. Before-handlers run in
//! order, each receiving a [`Next`] continuation; a handler that does not
//! call [`Next::run`] ends the chain and owns the response.
//!
//! Sealing appends a completion sentinel to a non-empty chain. The sentinel
//! only runs if every handler passed control along, so its flag in
//! [`Context::extras`] tells the pipeline whether to render.
//!
//! ```rust,ignore
//! struct RequireLogin;
//!
//! #[async_trait]
//! impl Middleware for RequireLogin {
//!     async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
//!         if ctx.request.header("cookie").is_none() {
//!             ctx.response = SprigResponse::redirect("/pages/login");
//!             return Ok(());
//!         }
//!         next.run(ctx).await
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;
use crate::view::Props;

/// Side-channel key set once every before-handler passed control along.
pub const MIDDLEWARES_FINISHED: &str = "sprig.middlewares_finished";

/// A before-handler.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Handles the request. Call `next.run(ctx)` to continue the chain.
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()>;
}

/// An after-handler, run with the resolved props before rendering.
#[async_trait]
pub trait AfterHandler: Send + Sync {
    /// Observes the props. Side effects only.
    async fn after(&self, ctx: &Context, props: &Props) -> Result<()>;
}

#[async_trait]
impl<F> AfterHandler for F
where
    F: Fn(&Context, &Props) -> Result<()> + Send + Sync,
{
    async fn after(&self, ctx: &Context, props: &Props) -> Result<()> {
        self(ctx, props)
    }
}

/// The rest of a middleware chain.
pub struct Next<'a> {
    remaining: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    /// Creates a continuation over `handlers`.
    pub fn new(handlers: &'a [Arc<dyn Middleware>]) -> Self {
        Self {
            remaining: handlers,
        }
    }

    /// Runs the next handler, if any.
    pub async fn run(self, ctx: &mut Context) -> Result<()> {
        match self.remaining.split_first() {
            Some((head, tail)) => head.handle(ctx, Next::new(tail)).await,
            None => Ok(()),
        }
    }
}

struct MiddlewaresFinished;

#[async_trait]
impl Middleware for MiddlewaresFinished {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
        ctx.set_flag(MIDDLEWARES_FINISHED);
        next.run(ctx).await
    }
}

/// Before and after handlers of one view.
#[derive(Clone, Default)]
pub struct ViewMiddleware {
    before: Vec<Arc<dyn Middleware>>,
    after: Option<Arc<dyn AfterHandler>>,
    sealed: bool,
}

impl ViewMiddleware {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a before-handler.
    ///
    /// On a sealed descriptor the handler goes in front of the sentinel.
    pub fn before<M: Middleware + 'static>(mut self, handler: M) -> Self {
        let handler: Arc<dyn Middleware> = Arc::new(handler);
        if self.sealed && !self.before.is_empty() {
            let at = self.before.len() - 1;
            self.before.insert(at, handler);
        } else {
            self.before.push(handler);
            if self.sealed {
                self.before.push(Arc::new(MiddlewaresFinished));
            }
        }
        self
    }

    /// Sets the after-handler, replacing any previous one.
    pub fn after<A: AfterHandler + 'static>(mut self, handler: A) -> Self {
        self.after = Some(Arc::new(handler));
        self
    }

    /// Appends the completion sentinel to a non-empty chain, once.
    pub fn seal(mut self) -> Self {
        if !self.sealed {
            if !self.before.is_empty() {
                self.before.push(Arc::new(MiddlewaresFinished));
            }
            self.sealed = true;
        }
        self
    }

    /// Returns true once [`seal`](Self::seal) ran.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Before-handlers, sentinel included when sealed.
    pub fn before_handlers(&self) -> &[Arc<dyn Middleware>] {
        &self.before
    }

    /// The after-handler, if any.
    pub fn after_handler(&self) -> Option<&Arc<dyn AfterHandler>> {
        self.after.as_ref()
    }

    /// Runs the before-handlers.
    ///
    /// Returns true if rendering should proceed: the chain is empty, or
    /// every handler called its continuation.
    pub async fn run_before(&self, ctx: &mut Context) -> Result<bool> {
        if self.before.is_empty() {
            return Ok(true);
        }
        Next::new(&self.before).run(ctx).await?;
        Ok(chain_finished(ctx))
    }
}

/// Returns true if the completion sentinel ran for this request.
pub fn chain_finished(ctx: &Context) -> bool {
    ctx.flag(MIDDLEWARES_FINISHED)
}
