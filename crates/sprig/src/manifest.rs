// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Mapping from discovered paths to module factories.
//!
//! Registries never import code at runtime. Instead, every module that can
//! be discovered is compiled in and listed here by its normalized path;
//! "loading" a discovered path calls its factory. The mapping is usually
//! produced by [`codegen`](crate::codegen) from a build script.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::api::ApiRegistrar;
use crate::error::{Error, Result};
use crate::middleware::ViewMiddleware;
use crate::registry::ModuleKind;
use crate::view::View;

type Factory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Compiled-in module factories, keyed by normalized path.
#[derive(Default, Clone)]
pub struct Manifest {
    views: HashMap<String, Factory<Arc<dyn View>>>,
    middleware: HashMap<String, Factory<ViewMiddleware>>,
    apis: HashMap<String, Arc<dyn ApiRegistrar>>,
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the server renderer of a frontend view.
    pub fn view<V, F>(&mut self, path: impl Into<String>, factory: F) -> &mut Self
    where
        V: View + 'static,
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.views
            .insert(path.into(), Arc::new(move || Arc::new(factory()) as Arc<dyn View>));
        self
    }

    /// Adds a backend view middleware.
    pub fn middleware<F>(&mut self, path: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> ViewMiddleware + Send + Sync + 'static,
    {
        self.middleware.insert(path.into(), Arc::new(factory));
        self
    }

    /// Adds an API route registrar.
    pub fn api<R>(&mut self, path: impl Into<String>, registrar: R) -> &mut Self
    where
        R: ApiRegistrar + 'static,
    {
        self.apis.insert(path.into(), Arc::new(registrar));
        self
    }

    /// Instantiates the view listed under `path`.
    pub fn load_view(&self, path: &str) -> Result<Arc<dyn View>> {
        let factory = self
            .views
            .get(path)
            .ok_or_else(|| Error::ModuleNotFound(path.to_string()))?;
        guarded(path, || factory())
    }

    /// Instantiates the view middleware listed under `path`.
    pub fn load_middleware(&self, path: &str) -> Result<ViewMiddleware> {
        let factory = self
            .middleware
            .get(path)
            .ok_or_else(|| Error::ModuleNotFound(path.to_string()))?;
        guarded(path, || factory())
    }

    /// Returns the API registrar listed under `path`.
    pub fn load_api(&self, path: &str) -> Result<Arc<dyn ApiRegistrar>> {
        self.apis
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ModuleNotFound(path.to_string()))
    }

    /// Paths listed for a module kind, sorted.
    pub fn paths(&self, kind: ModuleKind) -> Vec<String> {
        let mut paths: Vec<String> = match kind {
            ModuleKind::FrontendView => self.views.keys().cloned().collect(),
            ModuleKind::ViewMiddleware => self.middleware.keys().cloned().collect(),
            ModuleKind::ApiRegistrar => self.apis.keys().cloned().collect(),
        };
        paths.sort();
        paths
    }
}

/// Runs a factory, turning a panic into a load error.
fn guarded<T>(path: &str, factory: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(factory)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "factory panicked".to_string());
        Error::Load {
            path: path.to_string(),
            message,
        }
    })
}
