use async_trait::async_trait;
use futures::StreamExt;
use futures::future;
use serde::Deserialize;

use super::http_client::{HttpClientTrait, into_lines};
use crate::domain::{DomainError, Message, StreamRequest, StreamingProvider, TextStream};

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Ollama chat API adapter.
///
/// Unlike the Anthropic path there is no token ceiling here; a `max_tokens`
/// on the request is ignored.
#[derive(Debug)]
pub struct OllamaProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> OllamaProvider<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request(&self, request: &StreamRequest) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = Vec::with_capacity(request.messages.len() + 1);

        // Ollama takes the system prompt as a leading system-role message.
        if let Some(ref system) = request.system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }

        for message in &request.messages {
            messages.push(flatten_message(message));
        }

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "stream": true,
        });

        if let Some(temperature) = request.temperature {
            body["options"] = serde_json::json!({ "temperature": temperature });
        }

        body
    }
}

/// Ollama has no block-structured content; image blocks are dropped and only
/// the text survives.
fn flatten_message(message: &Message) -> serde_json::Value {
    serde_json::json!({
        "role": message.role,
        "content": message.content_text().unwrap_or(""),
    })
}

#[async_trait]
impl<C: HttpClientTrait> StreamingProvider for OllamaProvider<C> {
    async fn create_stream(&self, request: StreamRequest) -> Result<TextStream, DomainError> {
        let url = self.chat_url();
        let body = self.build_request(&request);
        let byte_stream = self
            .client
            .post_json_stream(&url, vec![("Content-Type", "application/json")], &body)
            .await?;

        let stream = into_lines(byte_stream).filter_map(|line| {
            future::ready(match line {
                Ok(line) => parse_chat_line(&line),
                Err(e) => Some(Err(e)),
            })
        });

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        "Ollama"
    }
}

/// Extract the content delta carried by one NDJSON line, if any.
fn parse_chat_line(line: &str) -> Option<Result<String, DomainError>> {
    if line.is_empty() {
        return None;
    }

    let reply: ChatReply = match serde_json::from_str(line) {
        Ok(reply) => reply,
        Err(e) => {
            return Some(Err(DomainError::provider(
                "Ollama",
                format!("Malformed response line: {}", e),
            )));
        }
    };

    if let Some(error) = reply.error {
        return Some(Err(DomainError::provider("Ollama", error)));
    }

    match reply.message {
        Some(message) if !message.content.is_empty() => Some(Ok(message.content)),
        // The done:true line usually carries an empty content
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    message: Option<ChatReplyMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}
