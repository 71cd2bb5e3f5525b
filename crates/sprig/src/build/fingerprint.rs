// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Computes the fingerprint of a set of build inputs.
///
/// The result is each relative path followed by its modification time in
/// milliseconds, then `true` or `false` for the build mode. A file whose
/// time cannot be read contributes the current time, forcing a rebuild.
pub async fn fingerprint(root: &Path, files: &[String], dev: bool) -> String {
    let mut out = String::new();
    for file in files {
        let modified = match tokio::fs::metadata(root.join(file)).await {
            Ok(meta) => meta.modified().ok(),
            Err(_) => None,
        };
        out.push_str(file);
        out.push_str(&millis(modified.unwrap_or_else(SystemTime::now)).to_string());
    }
    out.push_str(if dev { "true" } else { "false" });
    out
}

fn millis(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
