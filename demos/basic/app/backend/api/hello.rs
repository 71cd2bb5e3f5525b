// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! `/api/hello` routes.

use serde_json::json;
use sprig::{handler_fn, ApiRoutes, Context, Result, SprigResponse};

pub fn register(routes: &ApiRoutes) -> Result<()> {
    routes.get("/api/hello", |ctx: &mut Context| -> Result<()> {
        ctx.response = SprigResponse::json(200, &json!({ "hello": "world" }));
        Ok(())
    })?;

    routes.get("/api/hello/{name}", |ctx: &mut Context| -> Result<()> {
        let name = ctx.param("name").unwrap_or("world").to_string();
        ctx.response = SprigResponse::json(200, &json!({ "hello": name }));
        Ok(())
    })?;

    routes.post(
        "/api/echo",
        handler_fn(|mut ctx: Context| async move {
            let body = ctx.request.body.clone().unwrap_or_default();
            let payload: serde_json::Value = serde_json::from_slice(&body)?;
            ctx.response = SprigResponse::json(200, &json!({ "echo": payload }));
            Ok::<_, sprig::Error>(ctx)
        }),
    )
}
