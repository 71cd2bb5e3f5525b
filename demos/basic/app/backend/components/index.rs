// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Middleware of the `index` view: stamps every page with a request id and
//! logs the props it was rendered with.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sprig::{Context, Middleware, Next, Props, Result, ViewMiddleware};
use tracing::info;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct RequestId;

#[async_trait]
impl Middleware for RequestId {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
        let id = ctx
            .request
            .header("x-request-id")
            .map(str::to_string)
            .unwrap_or_else(|| NEXT_ID.fetch_add(1, Ordering::Relaxed).to_string());
        ctx.response.set_header("x-request-id", id);
        next.run(ctx).await
    }
}

pub fn middleware() -> ViewMiddleware {
    ViewMiddleware::new()
        .before(RequestId)
        .after(|ctx: &Context, props: &Props| -> Result<()> {
            info!(path = %ctx.request.path, props = props.len(), "Rendering index");
            Ok(())
        })
}
