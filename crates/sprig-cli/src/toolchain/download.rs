// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! esbuild download and extraction from the npm registry.

use super::types::{Platform, ToolchainError, ToolchainResult};
use super::FAILED_DOWNLOADS;
use console::style;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::PoisonError,
    time::Duration,
};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Maximum number of retry attempts for downloads
const MAX_RETRIES: u32 = 3;

/// Base delay in milliseconds for exponential backoff
const BASE_DELAY_MS: u64 = 500;

const REGISTRY: &str = "https://registry.npmjs.org";
const USER_AGENT: &str = "sprig-cli";

/// Downloads esbuild into `<cache_dir>/esbuild/<version>` and returns the
/// resolved version with the executable path.
pub async fn download_and_extract(
    platform: Platform,
    version: &str,
    cache_dir: &Path,
) -> ToolchainResult<(String, PathBuf)> {
    let tool_dir = cache_dir.join("esbuild");
    fs::create_dir_all(&tool_dir)?;

    let client = Client::new();
    let actual_version = if version == "latest" {
        fetch_latest_version(&client).await?
    } else {
        version.to_string()
    };

    let version_dir = tool_dir.join(&actual_version);
    fs::create_dir_all(&version_dir)?;

    let (archive, checksum) =
        download_with_retry(&client, platform, &actual_version, &version_dir).await?;
    let executable = extract(platform, &archive, &version_dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&executable)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&executable, perms)?;
    }

    fs::write(version_dir.join("esbuild.sha256"), checksum)?;

    if version == "latest" {
        let latest_link = tool_dir.join("latest");
        if latest_link.is_symlink() {
            let _ = fs::remove_file(&latest_link);
        }
        link_latest(&actual_version, &latest_link);
    }

    Ok((actual_version, executable))
}

#[cfg(unix)]
fn link_latest(version: &str, link: &Path) {
    if let Err(e) = std::os::unix::fs::symlink(version, link) {
        warn!(error = %e, "Could not update latest esbuild link");
    }
}

#[cfg(windows)]
fn link_latest(version: &str, link: &Path) {
    if let Err(e) = std::os::windows::fs::symlink_dir(version, link) {
        warn!(error = %e, "Could not update latest esbuild link");
    }
}

async fn fetch_latest_version(client: &Client) -> ToolchainResult<String> {
    let resp = client
        .get(format!("{}/esbuild", REGISTRY))
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    resp["dist-tags"]["latest"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ToolchainError::ReleaseFetchFailed(
                "Failed to parse esbuild latest version from dist-tags".to_string(),
            )
        })
}

async fn tarball_url(client: &Client, platform: Platform, version: &str) -> ToolchainResult<String> {
    let pkg = platform.package_name();
    let info = client
        .get(format!("{}/{}/{}", REGISTRY, pkg, version))
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    info["dist"]["tarball"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ToolchainError::DownloadFailed(format!(
                "Failed to extract tarball URL from package metadata: {}",
                pkg
            ))
        })
}

fn download_bar(version: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    let bar = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(bar);
    pb.set_message(format!(
        "Downloading {} v{}...",
        style("esbuild").cyan(),
        style(version).cyan()
    ));
    pb
}

async fn download_once(
    client: &Client,
    platform: Platform,
    version: &str,
    version_dir: &Path,
    pb: &ProgressBar,
) -> ToolchainResult<(PathBuf, String)> {
    let url = tarball_url(client, platform, version).await?;
    debug!(url = %url, "Downloading esbuild");

    let resp = client.get(&url).header("User-Agent", USER_AGENT).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ToolchainError::DownloadFailed(format!(
            "HTTP error: {} when downloading from URL: {}",
            status, url
        )));
    }
    pb.set_length(resp.content_length().unwrap_or(0));

    let download_path = version_dir.join("esbuild.tar.gz");
    let mut file = File::create(&download_path)?;
    let mut hasher = Sha256::new();
    let mut stream = resp.bytes_stream();
    let mut downloaded = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
        hasher.update(&chunk);
        file.write_all(&chunk)?;
    }

    Ok((download_path, format!("{:x}", hasher.finalize())))
}

async fn download_with_retry(
    client: &Client,
    platform: Platform,
    version: &str,
    version_dir: &Path,
) -> ToolchainResult<(PathBuf, String)> {
    let mut retries = 0;

    loop {
        let pb = download_bar(version);
        match download_once(client, platform, version, version_dir, &pb).await {
            Ok(res) => {
                pb.finish_with_message(format!(
                    "Downloaded {} v{}",
                    style("esbuild").green(),
                    style(version).green()
                ));
                return Ok(res);
            }
            Err(err) => {
                retries += 1;
                if retries >= MAX_RETRIES {
                    pb.abandon();
                    FAILED_DOWNLOADS
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(version.to_string());
                    return Err(err);
                }

                let delay = BASE_DELAY_MS * 2_u64.pow(retries - 1);
                pb.finish_with_message(format!(
                    "Download failed, retrying in {}ms ({}/{})",
                    style(delay).yellow(),
                    style(retries).yellow(),
                    style(MAX_RETRIES).yellow()
                ));
                sleep(Duration::from_millis(delay)).await;
            }
        }
    }
}

fn extract(platform: Platform, archive_path: &Path, extract_dir: &Path) -> ToolchainResult<PathBuf> {
    let file = File::open(archive_path)?;
    let decoder = flate2::read::GzDecoder::new(file);
    tar::Archive::new(decoder)
        .unpack(extract_dir)
        .map_err(|e| ToolchainError::ExtractionFailed(e.to_string()))?;
    fs::remove_file(archive_path)?;

    let executable = extract_dir.join(platform.executable_path());
    if !executable.exists() {
        return Err(ToolchainError::ExtractionFailed(format!(
            "{} missing from package",
            platform.executable_path()
        )));
    }
    Ok(executable)
}
