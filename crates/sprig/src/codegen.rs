// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Build-script generation of the module manifest.
//!
//! Every module the registries can discover must be compiled into the
//! binary. [`generate_manifest`] walks the directory conventions and emits
//! Rust source that declares each module file with `#[path]` and lists its
//! factory in a `manifest()` function:
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     let root = std::path::PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
//!     let generated = sprig::codegen::generate_manifest(&root, &sprig::Layout::default());
//!     print!("{}", generated.cargo_directives());
//!     generated.write_to(&std::env::var("OUT_DIR").unwrap()).unwrap();
//! }
//!
//! // main.rs
//! include!(concat!(env!("OUT_DIR"), "/sprig_manifest.rs"));
//! ```
//!
//! Module conventions:
//!
//! | File | Export |
//! |---|---|
//! | `<frontend_components>/X.rs` next to `X.tsx` | `pub fn view() -> impl View` |
//! | `<backend_components>/X.rs` | `pub fn middleware() -> ViewMiddleware` |
//! | `<backend_api>/X.rs` | `pub fn register(routes: &ApiRoutes) -> Result<()>` |

use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Layout;
use crate::registry::discover;

/// File name written by [`GeneratedManifest::write_to`].
pub const MANIFEST_FILE: &str = "sprig_manifest.rs";

/// Output of [`generate_manifest`].
#[derive(Debug, Clone, Default)]
pub struct GeneratedManifest {
    /// Rust source defining `pub fn manifest() -> ::sprig::Manifest`.
    pub source: String,
    /// Frontend views without a server renderer beside them.
    pub missing: Vec<String>,
    /// Directories whose changes require regeneration.
    pub watched: Vec<PathBuf>,
}

impl GeneratedManifest {
    /// `cargo:` lines for a build script: rerun triggers and a warning per
    /// view without a server renderer.
    pub fn cargo_directives(&self) -> String {
        let mut out = String::new();
        for dir in &self.watched {
            let _ = writeln!(out, "cargo:rerun-if-changed={}", dir.display());
        }
        for view in &self.missing {
            let _ = writeln!(out, "cargo:warning=sprig: {} has no server renderer and will not be routable", view);
        }
        out
    }

    /// Writes the source to `<out_dir>/sprig_manifest.rs`.
    pub fn write_to(&self, out_dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = out_dir.as_ref().join(MANIFEST_FILE);
        fs::write(&path, &self.source)?;
        Ok(path)
    }
}

/// Generates the manifest source for the project at `root`.
///
/// `root` should be absolute; the emitted `#[path]` attributes point at
/// `root`-joined files.
pub fn generate_manifest(root: &Path, layout: &Layout) -> GeneratedManifest {
    let mut modules = String::new();
    let mut entries = String::new();
    let mut missing = Vec::new();

    for (index, tsx) in discover(root, &layout.frontend_components, &["tsx"])
        .into_iter()
        .enumerate()
    {
        let renderer = format!("{}.rs", tsx.trim_end_matches(".tsx"));
        if !root.join(&renderer).is_file() {
            missing.push(tsx);
            continue;
        }
        let module = format!("__sprig_view_{}", index);
        declare(&mut modules, &module, &root.join(&renderer));
        let _ = writeln!(entries, "    manifest.view({:?}, {}::view);", tsx, module);
    }

    for (index, path) in discover(root, &layout.backend_components, &["rs"])
        .into_iter()
        .enumerate()
    {
        let module = format!("__sprig_middleware_{}", index);
        declare(&mut modules, &module, &root.join(&path));
        let _ = writeln!(entries, "    manifest.middleware({:?}, {}::middleware);", path, module);
    }

    for (index, path) in discover(root, &layout.backend_api, &["rs"])
        .into_iter()
        .enumerate()
    {
        let module = format!("__sprig_api_{}", index);
        declare(&mut modules, &module, &root.join(&path));
        let _ = writeln!(entries, "    manifest.api({:?}, {}::register);", path, module);
    }

    let mut source = String::from("// @generated by sprig::codegen. Do not edit.\n\n");
    source.push_str(&modules);
    source.push_str("\n/// Modules compiled into this binary, keyed by project-relative path.\n");
    source.push_str("pub fn manifest() -> ::sprig::Manifest {\n");
    source.push_str("    let mut manifest = ::sprig::Manifest::new();\n");
    source.push_str(&entries);
    source.push_str("    manifest\n}\n");

    let watched = [
        &layout.frontend_components,
        &layout.backend_components,
        &layout.backend_api,
    ]
    .into_iter()
    .map(|dir| root.join(dir))
    .collect();

    GeneratedManifest {
        source,
        missing,
        watched,
    }
}

fn declare(out: &mut String, module: &str, file: &Path) {
    let _ = writeln!(out, "#[path = {:?}]\nmod {};", file.to_string_lossy(), module);
}
