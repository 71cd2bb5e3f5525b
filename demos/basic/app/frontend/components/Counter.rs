// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Server renderer of `Counter.tsx`.

use serde_json::Value as JsonValue;
use sprig::{view_fn, View};

/// Same value as `Number(props.start ?? 0) || 0` on the client.
fn start(value: Option<&JsonValue>) -> f64 {
    let n = match value {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) if s.trim().is_empty() => 0.0,
        Some(JsonValue::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => 0.0,
    };
    if n.is_nan() || n == 0.0 {
        0.0
    } else {
        n
    }
}

/// Formats `n` the way JavaScript prints a number.
fn js_number(n: f64) -> String {
    if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        format!("{}Infinity", sign)
    } else {
        n.to_string()
    }
}

pub fn view() -> impl View {
    view_fn("Counter", |props| {
        Ok(format!(
            "<div class=\"counter\"><button>-</button><span> {} </span><button>+</button></div>",
            js_number(start(props.get("start")))
        ))
    })
}
