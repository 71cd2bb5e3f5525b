// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server with the dev push channel.

/// Axum adapter and router.
pub mod http;
/// WebSocket handler for refresh notifications.
pub mod livereload;

pub use http::{create_server, router, AppState};
