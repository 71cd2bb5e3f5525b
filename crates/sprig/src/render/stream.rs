// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Chunked HTML output.

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream};

/// Rendered HTML as an ordered list of chunks.
///
/// Adapters forward the chunks as a streamed response body; tests can
/// collect them with [`to_bytes`](Self::to_bytes).
#[derive(Debug, Clone, Default)]
pub struct HtmlStream {
    chunks: Vec<Bytes>,
}

impl HtmlStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk. Empty chunks are dropped.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        let chunk = chunk.into();
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// The chunks in order.
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// Consumes the stream into its chunks.
    pub fn into_chunks(self) -> Vec<Bytes> {
        self.chunks
    }

    /// Consumes the stream into an async byte stream.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
        stream::iter(self.chunks.into_iter().map(Ok))
    }

    /// Concatenates every chunk.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.chunks.iter().map(Bytes::len).sum());
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out.freeze()
    }
}

impl fmt::Display for HtmlStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.chunks {
            f.write_str(&String::from_utf8_lossy(chunk))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_stream_yields_chunks_in_order() {
        let mut html = HtmlStream::new();
        html.push("<p>");
        html.push("");
        html.push(String::from("hi</p>"));
        assert_eq!(html.chunks().len(), 2);
        assert_eq!(html.to_string(), "<p>hi</p>");

        let collected: Vec<Bytes> = html
            .into_stream()
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;
        assert_eq!(collected, vec![Bytes::from("<p>"), Bytes::from("hi</p>")]);
    }
}
