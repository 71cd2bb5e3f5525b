// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for Sprig.
//!
//! This module defines [`Error`], the error enum shared by discovery,
//! builds, middleware and rendering, and the [`Result`] alias.
//!
//! # Error Categories
//!
//! - **Discovery errors**: a module path has no factory or its factory failed
//! - **Build errors**: the external bundler rejected its input
//! - **Request errors**: middleware, handler or render failures
//! - **Storage errors**: the persisted cache could not be read or written

use std::error::Error as StdError;
use std::fmt::Write;

use thiserror::Error;

use crate::kv::KVError;

/// The main error type for Sprig operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A discovered path has no entry in the manifest.
    #[error("Module not found in manifest: {0}")]
    ModuleNotFound(String),

    /// A module factory failed while producing its artifact.
    #[error("Failed to load module {path}: {message}")]
    Load {
        /// Normalized path of the module.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// The external bundler failed.
    #[error("Bundle error: {0}")]
    Bundle(String),

    /// A view failed to render.
    #[error("Render error in {view}: {message}")]
    Render {
        /// Registered name of the view.
        view: String,
        /// What went wrong.
        message: String,
    },

    /// Serialized hydration props could not be produced or decoded.
    #[error("Hydration payload error: {0}")]
    Hydration(String),

    /// A middleware, after-handler or API handler failed.
    #[error("Handler error: {0}")]
    Handler(String),

    /// An API route could not be registered.
    #[error("Route error: {0}")]
    Route(String),

    /// Persisted storage failed.
    #[error("KV error: {0}")]
    Kv(#[from] KVError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a handler error from any message.
    pub fn handler(message: impl Into<String>) -> Self {
        Error::Handler(message.into())
    }

    /// Creates a render error for the named view.
    pub fn render(view: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Render {
            view: view.into(),
            message: message.into(),
        }
    }

    /// Formats the error, its debug form and its source chain.
    ///
    /// This is what the error page shows as the stack in development mode.
    pub fn trace(&self) -> String {
        let mut out = format!("{:?}", self);
        let mut source = self.source();
        while let Some(err) = source {
            let _ = write!(out, "\ncaused by: {}", err);
            source = err.source();
        }
        out
    }
}

/// Convenience type alias for Results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
