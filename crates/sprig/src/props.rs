// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request-to-props extraction.
//!
//! GET requests take their props from the query string. POST requests
//! merge the query string with body props, the body winning on collisions:
//!
//! - `application/json` bodies must be a JSON object.
//! - Form bodies (urlencoded or multipart) are flattened, repeated field
//!   names becoming arrays. A [`ROUTE_HELPER_FIELD`] field instead carries
//!   the whole body as JSON, which keeps nested content intact when the
//!   client navigates with a hidden form.
//!
//! Body parse failures never fail the request: they are logged and the
//! body contributes nothing.

use serde_json::Value as JsonValue;
use tracing::warn;

use crate::request::{Method, SprigRequest};
use crate::view::Props;

/// Form field whose value is a JSON object used as the entire body.
pub const ROUTE_HELPER_FIELD: &str = "faster_react_route_helper";

/// Errors that can occur while parsing a request body.
#[derive(Debug, thiserror::Error)]
pub enum BodyParseError {
    /// The body or route-helper field is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// The JSON is valid but not an object.
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
    /// The multipart body is malformed.
    #[error("Invalid multipart data: {0}")]
    InvalidMultipart(String),
    /// The content type is neither JSON nor a form encoding.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// Props for a request: query for GET, query merged with body for POST.
pub fn request_props(request: &SprigRequest) -> Props {
    let mut props = query_props(request);

    if request.method == Method::Post {
        match body_props(request) {
            Ok(body) => props.extend(body),
            Err(err) => warn!(path = %request.path, error = %err, "Ignoring unparsable request body"),
        }
    }

    props
}

/// Query parameters as string props. Repeated keys keep the last value.
pub fn query_props(request: &SprigRequest) -> Props {
    request
        .query
        .iter()
        .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
        .collect()
}

/// Props carried by the request body.
pub fn body_props(request: &SprigRequest) -> Result<Props, BodyParseError> {
    let body = request.body.as_deref().unwrap_or(&[]);

    match request.media_type().as_deref() {
        Some("application/json") => into_object(parse_json(body)?),
        Some("multipart/form-data") => {
            let content_type = request.content_type().unwrap_or_default();
            form_props(parse_multipart(body, content_type)?)
        }
        Some("application/x-www-form-urlencoded") | None => form_props(parse_urlencoded(body)),
        Some(other) => Err(BodyParseError::UnsupportedContentType(other.to_string())),
    }
}

fn form_props(fields: Vec<(String, String)>) -> Result<Props, BodyParseError> {
    if let Some((_, payload)) = fields.iter().find(|(name, _)| name == ROUTE_HELPER_FIELD) {
        return into_object(parse_json(payload.as_bytes())?);
    }
    Ok(collapse_fields(fields))
}

/// Flattens form fields, turning repeated names into arrays.
fn collapse_fields(fields: Vec<(String, String)>) -> Props {
    let mut props = Props::new();

    for (name, value) in fields {
        let value = JsonValue::String(value);
        match props.get_mut(&name) {
            Some(JsonValue::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = JsonValue::Array(vec![first, value]);
            }
            None => {
                props.insert(name, value);
            }
        }
    }

    props
}

fn into_object(value: JsonValue) -> Result<Props, BodyParseError> {
    match value {
        JsonValue::Object(map) => Ok(map),
        JsonValue::Array(_) => Err(BodyParseError::NotAnObject("array")),
        JsonValue::String(_) => Err(BodyParseError::NotAnObject("string")),
        JsonValue::Number(_) => Err(BodyParseError::NotAnObject("number")),
        JsonValue::Bool(_) => Err(BodyParseError::NotAnObject("boolean")),
        JsonValue::Null => Err(BodyParseError::NotAnObject("null")),
    }
}

fn parse_json(bytes: &[u8]) -> Result<JsonValue, BodyParseError> {
    serde_json::from_slice(bytes).map_err(|e| BodyParseError::InvalidJson(e.to_string()))
}

fn parse_urlencoded(bytes: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn parse_multipart(bytes: &[u8], content_type: &str) -> Result<Vec<(String, String)>, BodyParseError> {
    let boundary = content_type
        .split(';')
        .find(|s| s.trim().starts_with("boundary="))
        .and_then(|s| s.trim().strip_prefix("boundary="))
        .ok_or_else(|| BodyParseError::InvalidMultipart("Missing boundary".to_string()))?;

    let boundary = boundary.trim_matches('"');
    let delimiter = format!("--{}", boundary);

    let body_str = String::from_utf8_lossy(bytes);
    let mut fields = Vec::new();

    for part in body_str.split(&delimiter) {
        if part.trim().is_empty() || part.starts_with("--") {
            continue;
        }

        if let Some(idx) = part.find("\r\n\r\n") {
            let headers_str = &part[..idx];
            let content = part[idx + 4..].trim_end_matches("\r\n");

            // File uploads are not props.
            if headers_str.contains("filename=") {
                continue;
            }
            if let Some(name) = extract_form_field_name(headers_str) {
                fields.push((name.to_string(), content.to_string()));
            }
        }
    }

    Ok(fields)
}

fn extract_form_field_name(headers: &str) -> Option<&str> {
    for line in headers.lines() {
        if line.to_lowercase().starts_with("content-disposition:") {
            if let Some(name_part) = line.split(';').find(|s| s.trim().starts_with("name=")) {
                let name = name_part.trim().strip_prefix("name=")?;
                return Some(name.trim_matches('"'));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(content_type: &str, body: &str) -> SprigRequest {
        SprigRequest::new(Method::Post, "/pages/index")
            .with_header("content-type", content_type)
            .with_body(body.as_bytes().to_vec())
    }

    #[test]
    fn get_uses_query_only() {
        let req = SprigRequest::new(Method::Get, "/pages/index")
            .with_query_string("a=1&b=2")
            .with_body(b"ignored=1".to_vec());
        assert_eq!(JsonValue::Object(request_props(&req)), json!({"a": "1", "b": "2"}));
    }

    #[test]
    fn post_json_merges_with_query_and_body_wins() {
        let req = post("application/json", r#"{"x":5,"y":"body"}"#).with_query_string("y=6&z=7");
        assert_eq!(
            JsonValue::Object(request_props(&req)),
            json!({"x": 5, "y": "body", "z": "7"})
        );
    }

    #[test]
    fn urlencoded_repeated_fields_become_arrays() {
        let req = post(
            "application/x-www-form-urlencoded",
            "tag=a&tag=b&tag=c&name=sprig",
        );
        assert_eq!(
            JsonValue::Object(request_props(&req)),
            json!({"tag": ["a", "b", "c"], "name": "sprig"})
        );
    }

    #[test]
    fn route_helper_field_replaces_form_fields() {
        let payload = form_urlencoded::byte_serialize(br#"{"cart":{"items":[1,2]}}"#).collect::<String>();
        let req = post(
            "application/x-www-form-urlencoded",
            &format!("other=1&{}={}", ROUTE_HELPER_FIELD, payload),
        );
        assert_eq!(
            JsonValue::Object(request_props(&req)),
            json!({"cart": {"items": [1, 2]}})
        );
    }

    #[test]
    fn multipart_fields_are_collected() {
        let body = "--XyZ\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nHello\r\n\
                    --XyZ\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\r\ndata\r\n\
                    --XyZ--\r\n";
        let req = post("multipart/form-data; boundary=XyZ", body);
        assert_eq!(JsonValue::Object(request_props(&req)), json!({"title": "Hello"}));
    }

    #[test]
    fn invalid_json_body_falls_back_to_query() {
        let req = post("application/json", "{not json").with_query_string("q=1");
        assert_eq!(JsonValue::Object(request_props(&req)), json!({"q": "1"}));
        assert!(matches!(body_props(&req), Err(BodyParseError::InvalidJson(_))));
    }

    #[test]
    fn json_array_body_is_rejected() {
        let req = post("application/json", "[1,2]");
        assert!(matches!(body_props(&req), Err(BodyParseError::NotAnObject("array"))));
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let req = post("text/plain", "hello");
        assert!(matches!(
            body_props(&req),
            Err(BodyParseError::UnsupportedContentType(_))
        ));
    }
}
