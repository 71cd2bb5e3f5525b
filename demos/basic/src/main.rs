// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

include!(concat!(env!("OUT_DIR"), "/sprig_manifest.rs"));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sprig_cli::run(manifest()).await
}
