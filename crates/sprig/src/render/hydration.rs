// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Hydration instructions embedded next to rendered markup.
//!
//! Props travel as standard base64 of their UTF-8 JSON, so the payload is a
//! plain ASCII literal inside the script element. The client bootstrap's
//! `decodeProps` reverses the encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::view::Props;

/// Generates a fresh mount id.
///
/// The leading letter keeps the id a valid CSS selector.
pub fn mount_id() -> String {
    format!("c{}", Uuid::new_v4().simple())
}

/// Serializes props to base64-encoded JSON.
pub fn encode_props(props: &Props) -> Result<String> {
    let json = serde_json::to_vec(props)?;
    Ok(STANDARD.encode(json))
}

/// Decodes a payload produced by [`encode_props`].
pub fn decode_props(encoded: &str) -> Result<Props> {
    let json = STANDARD
        .decode(encoded)
        .map_err(|e| Error::Hydration(e.to_string()))?;
    match serde_json::from_slice(&json)? {
        JsonValue::Object(props) => Ok(props),
        other => Err(Error::Hydration(format!("props must be an object, got {}", other))),
    }
}

/// Quotes `s` as a JavaScript string literal safe inside `<script>`.
pub fn js_string(s: &str) -> String {
    JsonValue::String(s.to_string())
        .to_string()
        .replace("</", "<\\/")
}

/// The `startHydrate(...)` call for a mounted component.
pub fn hydration_call(component: &str, mount_id: &str, encoded_props: &str) -> String {
    format!(
        "startHydrate({}, {}, decodeProps({}))",
        js_string(component),
        js_string(&format!("#{}", mount_id)),
        js_string(encoded_props)
    )
}
