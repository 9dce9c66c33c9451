use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::domain::DomainError;

/// Stream type for raw HTTP response bodies
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DomainError>> + Send>>;

/// Trait for streaming HTTP operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "http",
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        use futures::StreamExt;
        // Dropping this stream drops the reqwest response, which closes the
        // upstream connection; that is what makes client-side cancellation
        // release upstream resources.
        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| DomainError::provider("http", format!("Stream error: {}", e)))
        });

        Ok(Box::pin(stream))
    }
}

/// Reassemble a byte stream into complete text lines.
///
/// Both upstream protocols are line-oriented (SSE, NDJSON) but a line may be
/// split across reads, possibly inside a multi-byte character; the carry
/// buffer therefore holds raw bytes and decoding happens only on complete
/// lines. A trailing line without a newline is flushed at end of stream.
pub(crate) fn into_lines(
    byte_stream: ByteStream,
) -> impl Stream<Item = Result<String, DomainError>> + Send {
    use futures::{StreamExt, future, stream};

    byte_stream
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .scan(Vec::new(), |buf: &mut Vec<u8>, item| {
            let lines: Vec<Result<String, DomainError>> = match item {
                Some(Ok(bytes)) => {
                    buf.extend_from_slice(&bytes);
                    let mut lines = Vec::new();
                    while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                        let line: Vec<u8> = buf.drain(..=pos).collect();
                        lines.push(Ok(decode_line(&line)));
                    }
                    lines
                }
                Some(Err(e)) => vec![Err(e)],
                None => {
                    if buf.is_empty() {
                        Vec::new()
                    } else {
                        vec![Ok(decode_line(&std::mem::take(buf)))]
                    }
                }
            };
            future::ready(Some(stream::iter(lines)))
        })
        .flatten()
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
