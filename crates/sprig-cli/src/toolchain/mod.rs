// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Frontend toolchain for sprig-cli.
//!
//! Resolves the esbuild executable used by [`EsbuildBundler`]: an explicit
//! `[esbuild] path` wins, then the per-user tool cache, and finally a
//! download of the platform package from the npm registry.

mod download;
pub mod esbuild;
pub mod types;

use console::style;
use directories::ProjectDirs;
use std::{
    fs,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use crate::config::EsbuildConfig;

pub use self::esbuild::EsbuildBundler;
pub use self::types::{Platform, ToolPath, ToolchainError, ToolchainResult};

/// Versions whose download already failed during this process.
pub(crate) static FAILED_DOWNLOADS: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Manages esbuild downloads and caching
pub struct ToolchainManager {
    cache_dir: PathBuf,
}

impl ToolchainManager {
    /// Creates a manager using the per-user cache directory.
    pub fn new() -> ToolchainResult<Self> {
        Self::with_cache_dir(Self::default_cache_dir()?)
    }

    /// Creates a manager caching tools under `cache_dir`.
    pub fn with_cache_dir(cache_dir: PathBuf) -> ToolchainResult<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn default_cache_dir() -> ToolchainResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "maravilla-labs", "sprig").ok_or_else(|| {
            ToolchainError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine cache directory",
            ))
        })?;
        Ok(proj_dirs.cache_dir().join("tools"))
    }

    /// Returns esbuild `version`, downloading it if it is not cached.
    pub async fn ensure(&self, version: &str) -> ToolchainResult<ToolPath> {
        let platform = Platform::current().ok_or_else(|| {
            ToolchainError::UnsupportedPlatform("Current platform is not supported".to_string())
        })?;

        if FAILED_DOWNLOADS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|v| v == version)
        {
            return Err(ToolchainError::DownloadFailed(
                "Previous download attempt failed, skipping retry".to_string(),
            ));
        }

        if let Some(cached) = self.find_cached(platform, version) {
            return Ok(cached);
        }

        let (version, path) =
            self::download::download_and_extract(platform, version, &self.cache_dir).await?;
        Ok(ToolPath { version, path })
    }

    /// Finds a cached esbuild `version`. "latest" follows the link written by
    /// the last latest download.
    pub fn find_cached(&self, platform: Platform, version: &str) -> Option<ToolPath> {
        let tool_dir = self.cache_dir.join("esbuild");
        let actual_version = if version == "latest" {
            let target = fs::read_link(tool_dir.join("latest")).ok()?;
            target.file_name()?.to_string_lossy().to_string()
        } else {
            version.to_string()
        };

        let path = tool_dir.join(&actual_version).join(platform.executable_path());
        path.exists().then_some(ToolPath {
            version: actual_version,
            path,
        })
    }
}

/// Resolves the esbuild executable for `config`.
pub async fn ensure_esbuild(config: &EsbuildConfig) -> ToolchainResult<ToolPath> {
    if let Some(path) = &config.path {
        if !path.exists() {
            return Err(ToolchainError::NotFound(path.clone()));
        }
        return Ok(ToolPath {
            version: "custom".to_string(),
            path: path.clone(),
        });
    }

    let tool = ToolchainManager::new()?.ensure(&config.version).await?;
    println!(
        "{} {} {}",
        style("✓").green(),
        style("esbuild").cyan(),
        style(format!("v{}", tool.version)).dim()
    );
    Ok(tool)
}
