//! Application state for shared services

use std::sync::Arc;

use crate::domain::{QueuePublisher, StreamingProvider};
use crate::infrastructure::SystemPromptResolver;

/// Shared per-process services, constructed once at startup and read-only
/// afterwards; safe to clone into every request task.
#[derive(Clone)]
pub struct AppState {
    pub anthropic: Arc<dyn StreamingProvider>,
    pub ollama: Arc<dyn StreamingProvider>,
    /// Absent when no broker is configured; the queued route then reports
    /// the sink as unconfigured instead of streaming.
    pub queue: Option<Arc<dyn QueuePublisher>>,
    pub queue_topic: String,
    pub system_prompt: Arc<SystemPromptResolver>,
    pub defaults: RequestDefaults,
}

/// Request parameter defaults resolved from configuration at startup
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub anthropic_temperature: f32,
    pub ollama_model: String,
}
