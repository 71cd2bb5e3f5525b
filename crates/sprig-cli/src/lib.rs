// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! Sprig CLI library.
//!
//! Turns the manifest compiled into an application binary into a runnable
//! program with `dev`, `serve` and `build` commands.
//!
//! # Features
//!
//! - **Development server** with hot reload over a WebSocket push channel
//! - **Persisted build cache** in SQLite
//! - **esbuild provisioning** from the npm registry
//! - **File watching** with debounced typed change events
//!
//! # Usage
//!
//! ```rust,ignore
//! include!(concat!(env!("OUT_DIR"), "/sprig_manifest.rs"));
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     sprig_cli::run(manifest()).await
//! }
//! ```
//!
//! ```bash
//! my-app dev      # Start development server
//! my-app build    # Build frontend artifacts
//! my-app serve    # Serve without dev tooling
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `sprig.toml` at the project root.

/// CLI commands (dev, build, serve).
pub mod commands;
/// Project configuration from `sprig.toml`.
pub mod config;
/// Key-Value store with SQLite backend.
pub mod kv;
/// HTTP server with the dev push channel.
pub mod server;
/// esbuild provisioning and the esbuild bundler.
pub mod toolchain;
/// File system watching for hot reload.
pub mod watcher;

use clap::{Parser, Subcommand};
use sprig::Manifest;
use tracing_subscriber::EnvFilter;

/// Command line of a sprig application.
#[derive(Debug, Parser)]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Server-side rendered application powered by sprig", long_about = None)]
pub struct Cli {
    /// Log level: error, warn, info, debug, trace (default: RUST_LOG, else info)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Quiet mode: only show errors (useful for CI)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start development server with hot reload
    Dev {
        /// Port to listen on (default: from sprig.toml)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (default: from sprig.toml)
        #[arg(long)]
        host: Option<String>,
    },
    /// Serve the application without dev tooling
    Serve {
        /// Port to listen on (default: from sprig.toml)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (default: from sprig.toml)
        #[arg(long)]
        host: Option<String>,
    },
    /// Build app.js and app.css into the persisted cache
    Build {
        /// Rebuild even if the cached artifacts are current
        #[arg(short, long)]
        force: bool,
    },
}

/// Parses the process arguments and runs the selected command.
pub async fn run(manifest: Manifest) -> anyhow::Result<()> {
    run_with(Cli::parse(), manifest).await
}

/// Runs an already parsed command line.
pub async fn run_with(cli: Cli, manifest: Manifest) -> anyhow::Result<()> {
    init_tracing(&cli);

    match cli.command {
        Commands::Dev { port, host } => commands::dev::run(manifest, host, port, cli.quiet).await,
        Commands::Serve { port, host } => commands::serve::run(manifest, host, port).await,
        Commands::Build { force } => commands::build::run(manifest, force).await,
    }
}

fn env_filter(cli: &Cli) -> EnvFilter {
    let fallback = if cli.quiet { "error" } else { "info" };
    match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(fallback)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    }
}

fn init_tracing(cli: &Cli) {
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dev_with_overrides() {
        let cli = Cli::try_parse_from(["app", "--log-level", "debug", "dev", "-p", "4000"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Dev { port, host } => {
                assert_eq!(port, Some(4000));
                assert_eq!(host, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_build_force() {
        let cli = Cli::try_parse_from(["app", "build", "--force", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Build { force: true }));
    }

    #[test]
    fn test_missing_command_is_an_error() {
        assert!(Cli::try_parse_from(["app"]).is_err());
    }
}
