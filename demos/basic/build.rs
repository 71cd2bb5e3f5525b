// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use sprig::codegen::generate_manifest;
use sprig::Layout;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = std::env::var("OUT_DIR")?;

    let generated = generate_manifest(&root, &Layout::default());
    print!("{}", generated.cargo_directives());
    generated.write_to(out_dir)?;
    Ok(())
}
