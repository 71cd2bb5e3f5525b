// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Client-side scripts appended to the generated JS entry.
//!
//! - [`BOOTSTRAP_JS`] defines `startHydrate`, `decodeProps` and
//!   `startDevTools` on `globalThis`, and registers the client side of the
//!   built-in error view. It expects a `components` object in scope mapping
//!   registered names to components.
//! - [`ROUTE_HELPER_JS`] defines `sprigRoute` and `getJSON` for client
//!   navigation against `/pages/*` and `/components/*`.

/// The hydration bootstrap.
pub const BOOTSTRAP_JS: &str = include_str!("bootstrap.js");

/// The client route helper.
pub const ROUTE_HELPER_JS: &str = include_str!("route.js");
