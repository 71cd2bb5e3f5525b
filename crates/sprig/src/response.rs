// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP response abstraction for Sprig.
//!
//! A [`SprigResponse`] lives inside every [`Context`](crate::Context) so
//! middleware can mutate status, headers and body before (or instead of)
//! rendering. Adapters convert it to their platform-specific type.

use bytes::Bytes;
use serde_json::Value as JsonValue;

use crate::render::HtmlStream;

/// Content type of rendered views.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Body of a [`SprigResponse`].
#[derive(Debug, Clone, Default)]
pub enum ResponseBody {
    /// No body.
    #[default]
    Empty,
    /// A complete body.
    Bytes(Bytes),
    /// Streamed HTML produced by the render pipeline.
    Html(HtmlStream),
}

/// A platform-agnostic, mutable HTTP response.
///
/// # Example
///
/// ```rust
/// use sprig::SprigResponse;
///
/// let redirect = SprigResponse::redirect("/login");
/// assert_eq!(redirect.status, 302);
/// assert_eq!(redirect.header("location"), Some("/login"));
/// ```
#[derive(Debug, Clone)]
pub struct SprigResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: ResponseBody,
}

impl Default for SprigResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: ResponseBody::Empty,
        }
    }
}

impl SprigResponse {
    /// Creates an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// 404 with an empty body.
    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// Streamed HTML response with status 200.
    pub fn html(stream: HtmlStream) -> Self {
        Self::new(200)
            .with_header("content-type", HTML_CONTENT_TYPE)
            .with_body(ResponseBody::Html(stream))
    }

    /// Plain-text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("content-type", "text/plain; charset=utf-8")
            .with_body(ResponseBody::Bytes(Bytes::from(body.into())))
    }

    /// JSON response.
    pub fn json(status: u16, body: &JsonValue) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(ResponseBody::Bytes(Bytes::from(body.to_string())))
    }

    /// 302 redirect to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(302).with_header("location", location)
    }

    /// Replaces the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.body = body;
        self
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Sets a header in place, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Gets a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Collects the body into one buffer.
    pub fn body_bytes(&self) -> Bytes {
        match &self.body {
            ResponseBody::Empty => Bytes::new(),
            ResponseBody::Bytes(b) => b.clone(),
            ResponseBody::Html(stream) => stream.to_bytes(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_empty() {
        let resp = SprigResponse::not_found();
        assert_eq!(resp.status, 404);
        assert!(resp.body_bytes().is_empty());
        assert!(!resp.is_success());
    }

    #[test]
    fn test_set_header_replaces() {
        let mut resp = SprigResponse::text(200, "hi");
        resp.set_header("Content-Type", "text/csv");
        assert_eq!(resp.header("content-type"), Some("text/csv"));
        assert_eq!(resp.headers.len(), 1);
    }

    #[test]
    fn test_json_response() {
        let resp = SprigResponse::json(201, &serde_json::json!({"ok": true}));
        assert_eq!(resp.status, 201);
        assert_eq!(resp.body_bytes(), Bytes::from_static(br#"{"ok":true}"#));
    }
}
