// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Sprig project configuration.
//!
//! Configuration is loaded from `sprig.toml` at the project root. Every
//! section is optional.
//!
//! # Example Configuration
//!
//! ```toml
//! [project]
//! name = "my-app"
//! version = "1.0.0"
//!
//! [framework]
//! title = "My App"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [paths]
//! frontend_components = "app/frontend/components"
//! frontend_files = "app/frontend/files"
//! frontend_css = "app/frontend/css"
//! backend_components = "app/backend/components"
//! backend_api = "app/backend/api"
//! static_dir = "app/static"
//! data_dir = ".sprig/data"
//!
//! [esbuild]
//! version = "0.24.0"
//! # path = "/usr/local/bin/esbuild"
//! ```

use serde::Deserialize;
use sprig::{Layout, SprigOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "sprig.toml";

/// Main configuration structure loaded from `sprig.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Project metadata (name, version).
    #[serde(default)]
    pub project: ProjectConfig,
    /// Framework-level page settings.
    #[serde(default)]
    pub framework: FrameworkConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory conventions.
    #[serde(default)]
    pub paths: PathsConfig,
    /// esbuild provisioning.
    #[serde(default)]
    pub esbuild: EsbuildConfig,
}

/// Project metadata configuration.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Project version (default: "0.1.0").
    #[serde(default = "default_version")]
    pub version: String,
}

/// Framework-level page settings.
#[derive(Debug, Deserialize)]
pub struct FrameworkConfig {
    /// Document title of every page (default: "Sprig App").
    #[serde(default = "default_title")]
    pub title: String,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Server host (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Directory conventions, relative to the project root.
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Frontend view components (default: "app/frontend/components").
    #[serde(default = "default_frontend_components")]
    pub frontend_components: String,
    /// Shared client scripts (default: "app/frontend/files").
    #[serde(default = "default_frontend_files")]
    pub frontend_files: String,
    /// Stylesheets (default: "app/frontend/css").
    #[serde(default = "default_frontend_css")]
    pub frontend_css: String,
    /// Backend view middleware (default: "app/backend/components").
    #[serde(default = "default_backend_components")]
    pub backend_components: String,
    /// API registrars (default: "app/backend/api").
    #[serde(default = "default_backend_api")]
    pub backend_api: String,
    /// Static assets served under `/static` (default: "app/static").
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Persistent data such as the build cache (default: ".sprig/data").
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

/// esbuild provisioning.
#[derive(Debug, Clone, Deserialize)]
pub struct EsbuildConfig {
    /// npm version to download, or "latest" (default).
    #[serde(default = "default_esbuild_version")]
    pub version: String,
    /// Explicit binary path; skips the cache and download.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_title() -> String {
    "Sprig App".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_frontend_components() -> String {
    Layout::default().frontend_components
}

fn default_frontend_files() -> String {
    Layout::default().frontend_files
}

fn default_frontend_css() -> String {
    Layout::default().frontend_css
}

fn default_backend_components() -> String {
    Layout::default().backend_components
}

fn default_backend_api() -> String {
    Layout::default().backend_api
}

fn default_static_dir() -> String {
    Layout::default().static_dir
}

fn default_data_dir() -> String {
    ".sprig/data".to_string()
}

fn default_esbuild_version() -> String {
    "latest".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            frontend_components: default_frontend_components(),
            frontend_files: default_frontend_files(),
            frontend_css: default_frontend_css(),
            backend_components: default_backend_components(),
            backend_api: default_backend_api(),
            static_dir: default_static_dir(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for EsbuildConfig {
    fn default() -> Self {
        Self {
            version: default_esbuild_version(),
            path: None,
        }
    }
}

impl PathsConfig {
    /// The directory layout handed to the framework core.
    pub fn layout(&self) -> Layout {
        Layout {
            frontend_components: self.frontend_components.clone(),
            frontend_files: self.frontend_files.clone(),
            frontend_css: self.frontend_css.clone(),
            backend_components: self.backend_components.clone(),
            backend_api: self.backend_api.clone(),
            static_dir: self.static_dir.clone(),
        }
    }
}

impl Config {
    /// Loads configuration from `sprig.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Loads configuration from `sprig.toml` under `root`.
    pub fn load_from(root: &Path) -> anyhow::Result<Self> {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Framework options for the project at `root`.
    pub fn options(&self, root: &Path, dev: bool) -> SprigOptions {
        SprigOptions::new(root)
            .with_dev(dev)
            .with_title(self.framework.title.clone())
            .with_layout(self.paths.layout())
    }
}
