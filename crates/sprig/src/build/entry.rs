// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::fmt::Write;
use std::path::Path;

use crate::client::{BOOTSTRAP_JS, ROUTE_HELPER_JS};
use crate::error::Result;
use crate::render::js_string;

/// Source of the virtual JS entry module.
///
/// `views` pairs each view's normalized path with its registered name.
/// Every view is imported and stored in `components` under its name, then
/// the bootstrap and route helper follow.
pub fn js_entry(views: &[(String, String)]) -> String {
    let mut entry = String::from("const components = {};\n");
    for (index, (path, name)) in views.iter().enumerate() {
        let _ = writeln!(
            entry,
            "import __sprig_{index} from {};\ncomponents[{}] = __sprig_{index};",
            js_string(&format!("./{}", path)),
            js_string(name),
        );
    }
    entry.push_str(BOOTSTRAP_JS);
    entry.push('\n');
    entry.push_str(ROUTE_HELPER_JS);
    entry
}

/// Concatenates stylesheets, each preceded by a path marker comment.
pub async fn concat_stylesheets(root: &Path, files: &[String]) -> Result<String> {
    let mut css = String::new();
    for file in files {
        let contents = tokio::fs::read_to_string(root.join(file)).await?;
        let _ = writeln!(css, "/* {} */", file);
        css.push_str(&contents);
        if !contents.ends_with('\n') {
            css.push('\n');
        }
    }
    Ok(css)
}
