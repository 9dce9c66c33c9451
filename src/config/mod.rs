mod app_config;

pub use app_config::{
    AnthropicConfig, AppConfig, LogFormat, LoggingConfig, OllamaConfig, QueueConfig, ServerConfig,
    SystemPromptPath,
};
