// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The full-page document shell.

use crate::html::escape;

use super::PageMeta;

/// Everything before the page's mount container.
pub fn document_head(meta: &PageMeta) -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html><head>",
            "<meta charset=\"utf-8\">",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            "<link rel=\"icon\" type=\"image/x-icon\" href=\"/static/favicon.ico\">",
            "<title>{}</title>",
            "</head><body>",
            "<script src=\"/app.js\"></script>",
            "<link rel=\"stylesheet\" href=\"/app.css\">"
        ),
        escape(&meta.title)
    )
}

/// Everything after the page's hydration script.
pub fn document_tail() -> &'static str {
    "</body></html>"
}

/// Wraps `script` so it runs once the document has loaded.
pub fn on_content_loaded(script: &str) -> String {
    format!(
        "document.addEventListener(\"DOMContentLoaded\", function () {{ {}; }});",
        script
    )
}
