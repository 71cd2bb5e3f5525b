// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! [`Bundler`] backed by the esbuild executable.
//!
//! Both artifacts are built through stdin/stdout so nothing is written to
//! the project tree.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use sprig::{Bundler, Error, JsBundleRequest, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs esbuild for JS bundles and CSS minification.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    path: PathBuf,
}

impl EsbuildBundler {
    /// Creates a bundler running the executable at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the esbuild executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run(&self, args: Vec<String>, input: String, cwd: &Path) -> Result<Vec<u8>> {
        let start = Instant::now();
        let mut child = Command::new(&self.path)
            .args(&args)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Bundle(format!("failed to start {}: {}", self.path.display(), e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Bundle("esbuild stdin unavailable".to_string()))?;
        let writer = tokio::spawn(async move {
            let written = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            written
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::Bundle(e.to_string()))?;
        if let Ok(Err(e)) = writer.await {
            debug!(error = %e, "esbuild closed stdin early");
        }

        if !output.status.success() {
            return Err(Error::Bundle(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        if !output.stderr.is_empty() {
            warn!("esbuild: {}", String::from_utf8_lossy(&output.stderr).trim());
        }

        debug!(elapsed = ?start.elapsed(), bytes = output.stdout.len(), "esbuild finished");
        Ok(output.stdout)
    }
}

/// Arguments for a JS bundle build.
pub fn js_args(request: &JsBundleRequest) -> Vec<String> {
    let mut args: Vec<String> = [
        "--bundle",
        "--platform=browser",
        "--format=iife",
        "--tree-shaking=true",
        "--jsx=automatic",
        "--charset=utf8",
        "--loader=tsx",
        "--sourcefile=sprig-entry.tsx",
        "--log-level=warning",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    args.push(format!("--resolve-dir={}", request.resolve_dir.display()));
    if request.dev {
        args.push("--jsx-dev".to_string());
    } else {
        args.push("--minify".to_string());
    }
    args
}

/// Arguments for CSS minification.
pub fn css_args() -> Vec<String> {
    ["--loader=css", "--minify", "--charset=utf8", "--log-level=warning"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle_js(&self, request: JsBundleRequest) -> Result<Vec<u8>> {
        let args = js_args(&request);
        self.run(args, request.entry, &request.resolve_dir).await
    }

    async fn minify_css(&self, css: String, resolve_dir: PathBuf) -> Result<Vec<u8>> {
        self.run(css_args(), css, &resolve_dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(dev: bool) -> JsBundleRequest {
        JsBundleRequest {
            entry: "const components = {};".to_string(),
            resolve_dir: PathBuf::from("/project"),
            dev,
        }
    }

    #[test]
    fn test_js_args_follow_mode() {
        let prod = js_args(&request(false));
        assert!(prod.contains(&"--minify".to_string()));
        assert!(!prod.contains(&"--jsx-dev".to_string()));
        assert!(prod.contains(&"--resolve-dir=/project".to_string()));

        let dev = js_args(&request(true));
        assert!(dev.contains(&"--jsx-dev".to_string()));
        assert!(!dev.contains(&"--minify".to_string()));
        assert!(dev.contains(&"--jsx=automatic".to_string()));
    }

    #[tokio::test]
    async fn test_missing_executable_is_a_bundle_error() {
        let bundler = EsbuildBundler::new("/definitely/not/esbuild");
        let err = bundler
            .minify_css("a{}".to_string(), std::env::temp_dir())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Bundle(_)));
    }

    #[cfg(unix)]
    fn script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-esbuild");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdin_is_piped_to_stdout() {
        let temp = tempfile::TempDir::new().unwrap();
        let bundler = EsbuildBundler::new(script(temp.path(), "cat"));

        let mut req = request(true);
        req.resolve_dir = temp.path().to_path_buf();
        let out = bundler.bundle_js(req).await.unwrap();
        assert_eq!(out, b"const components = {};");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let temp = tempfile::TempDir::new().unwrap();
        let bundler = EsbuildBundler::new(script(temp.path(), "echo 'syntax error' >&2\nexit 1"));

        let err = bundler
            .minify_css("a{".to_string(), temp.path().to_path_buf())
            .await
            .unwrap_err();
        match err {
            Error::Bundle(msg) => assert!(msg.contains("syntax error")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
