// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Server renderer of `index.tsx`.

use sprig::html::{escape, prop_text};
use sprig::{view_fn, View};

pub fn view() -> impl View {
    view_fn("Home", |props| {
        let name = match prop_text(props, "name") {
            name if name.is_empty() => "world".to_string(),
            name => name,
        };
        Ok(format!(
            concat!(
                "<main><h1>Hello {}</h1>",
                "<p><a href=\"/pages/Counter?start=3\">Open the counter</a></p>",
                "<div id=\"counter-slot\"></div>",
                "<button>Load counter here</button></main>"
            ),
            escape(&name)
        ))
    })
}
