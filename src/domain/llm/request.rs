use serde::{Deserialize, Serialize};

use super::Message;

/// Parameters for one upstream streaming call.
///
/// The system prompt is already resolved by the time a `StreamRequest` is
/// built; providers use it verbatim or omit it when `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub model: String,
    /// Upper bound on generated tokens. Not every provider supports one;
    /// the Ollama path ignores it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl StreamRequest {
    pub fn new(messages: Vec<Message>, model: impl Into<String>) -> Self {
        Self {
            messages,
            system: None,
            model: model.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn builder() -> StreamRequestBuilder {
        StreamRequestBuilder::default()
    }
}

/// Builder for StreamRequest
#[derive(Debug, Default)]
pub struct StreamRequestBuilder {
    messages: Vec<Message>,
    system: Option<String>,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl StreamRequestBuilder {
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(Message::user(content))
    }

    pub fn assistant(self, content: impl Into<String>) -> Self {
        self.message(Message::assistant(content))
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn maybe_system(mut self, system: Option<String>) -> Self {
        self.system = system;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn build(self) -> StreamRequest {
        StreamRequest {
            messages: self.messages,
            system: self.system,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = StreamRequest::builder()
            .system("You are a personal AI assistant")
            .user("Hello!")
            .model("claude-3-opus-20240229")
            .max_tokens(1024)
            .temperature(0.8)
            .build();

        assert_eq!(request.messages.len(), 1);
        assert_eq!(
            request.system.as_deref(),
            Some("You are a personal AI assistant")
        );
        assert_eq!(request.max_tokens, Some(1024));
        assert_eq!(request.temperature, Some(0.8));
    }

    #[test]
    fn test_maybe_system_absent() {
        let request = StreamRequest::builder()
            .user("Hi")
            .maybe_system(None)
            .model("llama3")
            .build();

        assert!(request.system.is_none());
        assert!(request.max_tokens.is_none());
    }
}
