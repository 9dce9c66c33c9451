use async_trait::async_trait;
use futures::StreamExt;
use futures::future;
use serde::Deserialize;

use super::http_client::{HttpClientTrait, into_lines};
use crate::domain::{DomainError, StreamRequest, StreamingProvider, TextStream};

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Messages API adapter
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    /// Fails fast when the API key is missing; this is a startup-time
    /// condition, not a per-request one.
    pub fn new(client: C, api_key: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DomainError::configuration("Anthropic API key is not set."));
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, request: &StreamRequest) -> serde_json::Value {
        // Domain messages serialize to the Anthropic wire shape directly
        // (string content or typed text/image blocks), so they pass through.
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "stream": true,
        });

        if let Some(ref system) = request.system {
            body["system"] = serde_json::json!(system);
        }

        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> StreamingProvider for AnthropicProvider<C> {
    async fn create_stream(&self, request: StreamRequest) -> Result<TextStream, DomainError> {
        let url = self.messages_url();
        let body = self.build_request(&request);
        let byte_stream = self
            .client
            .post_json_stream(&url, self.headers(), &body)
            .await?;

        let stream = into_lines(byte_stream).filter_map(|line| {
            future::ready(match line {
                Ok(line) => parse_sse_line(&line),
                Err(e) => Some(Err(e)),
            })
        });

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

/// Extract the text delta carried by one SSE data line, if any. Unknown but
/// well-formed events are skipped; an unparseable data payload is an error.
fn parse_sse_line(line: &str) -> Option<Result<String, DomainError>> {
    let data = line.strip_prefix("data: ")?;
    let event: AnthropicStreamEvent = match serde_json::from_str(data) {
        Ok(event) => event,
        Err(e) => {
            return Some(Err(DomainError::provider(
                "anthropic",
                format!("Malformed event data: {}", e),
            )));
        }
    };

    match event.event_type.as_str() {
        "content_block_delta" => {
            let delta = event.delta?;
            if delta.delta_type == "text_delta" {
                delta.text.map(Ok)
            } else {
                None
            }
        }
        "error" => {
            let message = event
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "unknown upstream error".to_string());
            Some(Err(DomainError::provider("anthropic", message)))
        }
        // message_start, ping, message_stop and friends carry no text
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicStreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    delta: Option<StreamDelta>,
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(rename = "type", default)]
    delta_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use bytes::Bytes;

    const TEST_URL: &str = "https://api.anthropic.com/v1/messages";

    fn delta_event(text: &str) -> Bytes {
        Bytes::from(format!(
            "event: content_block_delta\ndata: {{\"type\":\"content_block_delta\",\"index\":0,\"delta\":{{\"type\":\"text_delta\",\"text\":\"{}\"}}}}\n\n",
            text
        ))
    }

    fn request() -> StreamRequest {
        StreamRequest::builder()
            .system("You are a personal AI assistant")
            .user("Hello!")
            .model("claude-3-opus-20240229")
            .max_tokens(1024)
            .temperature(0.8)
            .build()
    }

    async fn collect(mut stream: TextStream) -> Result<String, DomainError> {
        let mut out = String::new();
        while let Some(chunk) = stream.next().await {
            out.push_str(&chunk?);
        }
        Ok(out)
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = AnthropicProvider::new(MockHttpClient::new(), "").unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("Anthropic API key is not set."));
    }

    #[tokio::test]
    async fn test_stream_yields_deltas_in_order() {
        let client = MockHttpClient::new().with_stream_response(
            TEST_URL,
            vec![
                Bytes::from("event: message_start\ndata: {\"type\":\"message_start\"}\n\n"),
                delta_event("Hel"),
                delta_event("lo"),
                Bytes::from("event: message_stop\ndata: {\"type\":\"message_stop\"}\n\n"),
            ],
        );

        let provider = AnthropicProvider::new(client, "test-key").unwrap();
        let stream = provider.create_stream(request()).await.unwrap();

        assert_eq!(collect(stream).await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_event_split_across_reads() {
        let event = delta_event("chunk");
        let (a, b) = event.split_at(20);
        let client = MockHttpClient::new().with_stream_response(
            TEST_URL,
            vec![Bytes::copy_from_slice(a), Bytes::copy_from_slice(b)],
        );

        let provider = AnthropicProvider::new(client, "test-key").unwrap();
        let stream = provider.create_stream(request()).await.unwrap();

        assert_eq!(collect(stream).await.unwrap(), "chunk");
    }

    #[tokio::test]
    async fn test_request_failure_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 429: rate limited");

        let provider = AnthropicProvider::new(client, "test-key").unwrap();
        let err = provider
            .create_stream(request())
            .await
            .map(|_| ())
            .unwrap_err();

        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_malformed_event_data_is_an_error() {
        let client = MockHttpClient::new()
            .with_stream_response(TEST_URL, vec![Bytes::from("data: not json\n\n")]);

        let provider = AnthropicProvider::new(client, "test-key").unwrap();
        let stream = provider.create_stream(request()).await.unwrap();

        let err = collect(stream).await.unwrap_err();
        assert!(err.to_string().contains("Malformed event data"));
    }

    #[tokio::test]
    async fn test_error_event_surfaces_mid_stream() {
        let client = MockHttpClient::new().with_stream_response(
            TEST_URL,
            vec![
                delta_event("partial"),
                Bytes::from(
                    "event: error\ndata: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n\n",
                ),
            ],
        );

        let provider = AnthropicProvider::new(client, "test-key").unwrap();
        let mut stream = provider.create_stream(request()).await.unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap(), "partial");
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("Overloaded"));
    }

    #[tokio::test]
    async fn test_build_request_includes_system_and_params() {
        let provider =
            AnthropicProvider::new(MockHttpClient::new(), "test-key").unwrap();
        let body = provider.build_request(&request());

        assert_eq!(body["model"], "claude-3-opus-20240229");
        assert_eq!(body["system"], "You are a personal AI assistant");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello!");
    }

    #[tokio::test]
    async fn test_build_request_omits_absent_system() {
        let provider =
            AnthropicProvider::new(MockHttpClient::new(), "test-key").unwrap();
        let request = StreamRequest::builder()
            .user("Hi")
            .model("claude-3-haiku-20240307")
            .build();

        let body = provider.build_request(&request);
        assert!(body.get("system").is_none());
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
    }
}
