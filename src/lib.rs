//! LLM Chat Gateway
//!
//! A backend gateway that accepts chat requests over HTTP and streams tokens
//! back from one of two upstream providers (Anthropic, Ollama), with an
//! optional queued delivery mode that hands complete responses to a message
//! queue instead of streaming them.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::{AppState, RequestDefaults};
use domain::QueuePublisher;
use infrastructure::llm::{AnthropicProvider, HttpClient, OllamaProvider};
use infrastructure::{AmqpQueuePublisher, SystemPromptResolver};

/// Construct every shared service once, at startup. A missing Anthropic key
/// fails here rather than on the first request.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key = config.anthropic.api_key.clone().unwrap_or_default();
    let anthropic =
        AnthropicProvider::with_base_url(HttpClient::new(), api_key, &config.anthropic.base_url)?;
    let ollama = OllamaProvider::with_base_url(HttpClient::new(), &config.ollama.base_url);

    let queue: Option<Arc<dyn QueuePublisher>> = match &config.queue.url {
        Some(url) => Some(Arc::new(AmqpQueuePublisher::connect(url).await?)),
        None => {
            info!("No queue broker configured; /llm/ollama/mq will report the sink as missing");
            None
        }
    };

    Ok(AppState {
        anthropic: Arc::new(anthropic),
        ollama: Arc::new(ollama),
        queue,
        queue_topic: config.queue.topic.clone(),
        system_prompt: Arc::new(SystemPromptResolver::new(&config.system_prompt_path.0)),
        defaults: RequestDefaults {
            anthropic_model: config.anthropic.model.clone(),
            anthropic_max_tokens: config.anthropic.max_tokens,
            anthropic_temperature: config.anthropic.temperature,
            ollama_model: config.ollama.model.clone(),
        },
    })
}
