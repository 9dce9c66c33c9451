//! HTTP wire types for the /llm surface

pub mod chat;
pub mod error;
pub mod json;

pub use chat::{AnthropicModel, ChatStreamRequest, OllamaChatRequest};
pub use error::{ServiceError, ServiceErrorBody};
pub use json::Json;
