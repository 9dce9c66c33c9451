//! Wire types for the /llm routes
//!
//! The message shape on the wire is the domain shape (string content or
//! typed text/image blocks), so domain messages deserialize directly.

use serde::{Deserialize, Serialize};

use super::error::ServiceError;
use crate::domain::Message;

/// Supported Anthropic model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnthropicModel {
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
    #[serde(rename = "claude-3-sonnet-20240229")]
    Claude3Sonnet,
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
    #[serde(rename = "claude-2.1")]
    Claude21,
    #[serde(rename = "claude-2.0")]
    Claude20,
    #[serde(rename = "claude-instant-1.2")]
    ClaudeInstant12,
}

impl AnthropicModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude3Opus => "claude-3-opus-20240229",
            Self::Claude3Sonnet => "claude-3-sonnet-20240229",
            Self::Claude3Haiku => "claude-3-haiku-20240307",
            Self::Claude21 => "claude-2.1",
            Self::Claude20 => "claude-2.0",
            Self::ClaudeInstant12 => "claude-instant-1.2",
        }
    }
}

/// POST /llm/anthropic body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub model: Option<AnthropicModel>,
}

/// POST /llm/ollama and /llm/ollama/mq body; this path has no token ceiling.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub model: Option<String>,
}

fn check_messages(messages: &[Message]) -> Result<(), ServiceError> {
    if messages.is_empty() {
        return Err(
            ServiceError::bad_request("Messages cannot be empty").with_detail("field", "messages")
        );
    }
    Ok(())
}

fn check_temperature(temperature: Option<f32>) -> Result<(), ServiceError> {
    if let Some(temperature) = temperature {
        if !(temperature > 0.0 && temperature <= 1.0) {
            return Err(ServiceError::bad_request("Temperature must be in (0, 1]")
                .with_detail("field", "temperature"));
        }
    }
    Ok(())
}

impl ChatStreamRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_messages(&self.messages)?;
        check_temperature(self.temperature)?;
        if self.max_tokens == Some(0) {
            return Err(ServiceError::bad_request("max_tokens must be at least 1")
                .with_detail("field", "max_tokens"));
        }
        Ok(())
    }
}

impl OllamaChatRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_messages(&self.messages)?;
        check_temperature(self.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anthropic_request(json: serde_json::Value) -> ChatStreamRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_minimal_request_deserializes() {
        let request = anthropic_request(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}]
        }));

        assert!(request.validate().is_ok());
        assert!(request.system.is_none());
        assert!(request.model.is_none());
    }

    #[test]
    fn test_model_identifier_round_trip() {
        let request = anthropic_request(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "model": "claude-3-haiku-20240307"
        }));

        assert_eq!(request.model, Some(AnthropicModel::Claude3Haiku));
        assert_eq!(request.model.unwrap().as_str(), "claude-3-haiku-20240307");
    }

    #[test]
    fn test_empty_messages_rejected() {
        let request = anthropic_request(serde_json::json!({ "messages": [] }));
        let err = request.validate().unwrap_err();
        assert!(err.body.message.contains("Messages cannot be empty"));
    }

    #[test]
    fn test_temperature_bounds() {
        for bad in [0.0_f32, -0.2, 1.5] {
            let request = anthropic_request(serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": bad
            }));
            assert!(request.validate().is_err(), "temperature {} accepted", bad);
        }

        let request = anthropic_request(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": 1.0
        }));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let request = anthropic_request(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "max_tokens": 0
        }));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_ollama_request_has_no_max_tokens() {
        let request: OllamaChatRequest = serde_json::from_value(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "model": "llama3",
            "max_tokens": 512
        }))
        .unwrap();

        // Unknown fields are ignored on this path; there is no ceiling to set.
        assert!(request.validate().is_ok());
        assert_eq!(request.model.as_deref(), Some("llama3"));
    }
}
