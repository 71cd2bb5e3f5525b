// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Server-side rendering of pages and fragments.
//!
//! Both modes render the view into a mount container and follow it with an
//! inline script that hydrates the container on the client:
//!
//! ```text
//! <div id="c4f0..." class="sprig-component Counter">...markup...</div>
//! <script>startHydrate("Counter", "#c4f0...", decodeProps("eyJ..."));</script>
//! ```
//!
//! Pages additionally wrap the container in the document shell and defer the
//! hydration call (and, in development, `startDevTools()`) until
//! `DOMContentLoaded`, since the bundle loads at the top of `<body>`.

mod document;
mod error_view;
mod hydration;
mod stream;

pub use document::{document_head, document_tail};
pub use error_view::{error_props, ErrorView, ERROR_VIEW_NAME};
pub use hydration::{decode_props, encode_props, hydration_call, js_string, mount_id};
pub use stream::HtmlStream;

use crate::error::Result;
use crate::html::escape;
use crate::view::{Props, View};

use document::on_content_loaded;

/// How a view is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// A full HTML document (`/`, `/pages/*`).
    Page,
    /// A bare fragment (`/components/*`).
    Fragment,
}

impl RenderMode {
    /// CSS class marking the mount container.
    pub fn container_class(&self) -> &'static str {
        match self {
            RenderMode::Page => "sprig-page",
            RenderMode::Fragment => "sprig-component",
        }
    }
}

/// Framework-level page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    /// Document title.
    pub title: String,
    /// Arms the dev-mode reload client on pages.
    pub dev: bool,
}

impl PageMeta {
    /// Metadata for production rendering.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            dev: false,
        }
    }

    /// Sets development mode.
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }
}

/// Renders `view` with `props` in the given mode.
pub fn render(view: &dyn View, props: &Props, mode: RenderMode, meta: &PageMeta) -> Result<HtmlStream> {
    let markup = view.render(props)?;
    let id = mount_id();
    let call = hydration_call(view.name(), &id, &encode_props(props)?);
    let container = format!(
        "<div id=\"{}\" class=\"{} {}\">{}</div>",
        id,
        mode.container_class(),
        escape(view.name()),
        markup
    );

    let mut html = HtmlStream::new();
    match mode {
        RenderMode::Fragment => {
            html.push(format!("{}<script>{};</script>", container, call));
        }
        RenderMode::Page => {
            let mut script = on_content_loaded(&call);
            if meta.dev {
                script.push_str(&on_content_loaded("startDevTools()"));
            }
            html.push(document_head(meta));
            html.push(format!("{}<script>{}</script>", container, script));
            html.push(document_tail());
        }
    }
    Ok(html)
}

/// Renders a full page.
pub fn render_page(view: &dyn View, props: &Props, meta: &PageMeta) -> Result<HtmlStream> {
    render(view, props, RenderMode::Page, meta)
}

/// Renders a fragment.
pub fn render_fragment(view: &dyn View, props: &Props) -> Result<HtmlStream> {
    render(view, props, RenderMode::Fragment, &PageMeta::new(""))
}
