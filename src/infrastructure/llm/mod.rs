//! Upstream provider adapters

mod anthropic;
mod http_client;
mod ollama;

pub use anthropic::AnthropicProvider;
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use ollama::OllamaProvider;
