// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The built-in error view.

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::html::{escape, prop_text};
use crate::view::{Props, View};

/// Component name of the error view, shared with the client bootstrap.
pub const ERROR_VIEW_NAME: &str = "FrameworkErrorPage";

/// Renders `{msg, stack}` props as an error report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorView;

impl View for ErrorView {
    fn name(&self) -> &str {
        ERROR_VIEW_NAME
    }

    fn render(&self, props: &Props) -> Result<String> {
        Ok(format!(
            "<h1>Error</h1><ul><li><strong>Error:</strong> {}</li><li><strong>Stack:</strong> {}</li></ul>",
            escape(&prop_text(props, "msg")),
            escape(&prop_text(props, "stack"))
        ))
    }
}

/// Props for the error view. The stack is only exposed in development.
pub fn error_props(err: &Error, dev: bool) -> Props {
    let mut props = Props::new();
    props.insert("dev".to_string(), JsonValue::Bool(dev));
    props.insert("msg".to_string(), JsonValue::String(err.to_string()));
    let stack = if dev { err.trace() } else { String::new() };
    props.insert("stack".to_string(), JsonValue::String(stack));
    props
}
