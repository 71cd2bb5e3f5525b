// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The view rendering contract.
//!
//! A view renders props to markup. Its [`View::name`] is the component
//! name registered in the client bundle, so the hydration script emitted
//! next to the markup resolves to the same component in the browser.

use crate::error::Result;

/// Props passed to a view: a JSON object.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Server-side renderer of one view component.
pub trait View: Send + Sync {
    /// Registered component name.
    fn name(&self) -> &str;

    /// Renders the component's markup for `props`.
    fn render(&self, props: &Props) -> Result<String>;
}

/// A [`View`] backed by a closure. See [`view_fn`].
pub struct FnView<F> {
    name: String,
    render: F,
}

/// Creates a view from a name and a render closure.
///
/// ```rust
/// use sprig::{view_fn, View};
///
/// let hello = view_fn("Hello", |props| {
///     Ok(format!("<p>{}</p>", sprig::html::prop_text(props, "who")))
/// });
/// assert_eq!(hello.name(), "Hello");
/// ```
pub fn view_fn<F>(name: impl Into<String>, render: F) -> FnView<F>
where
    F: Fn(&Props) -> Result<String> + Send + Sync,
{
    FnView {
        name: name.into(),
        render,
    }
}

impl<F> View for FnView<F>
where
    F: Fn(&Props) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &Props) -> Result<String> {
        (self.render)(props)
    }
}
