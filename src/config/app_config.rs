use serde::Deserialize;

/// Application configuration, resolved once at startup and read-only after.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub anthropic: AnthropicConfig,
    pub ollama: OllamaConfig,
    pub queue: QueueConfig,
    /// Static fallback system prompt; absence means "no default prompt".
    pub system_prompt_path: SystemPromptPath,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Anthropic credentials and request defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

/// Queued delivery settings; without a URL the `/llm/ollama/mq` route reports
/// the sink as unconfigured.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub url: Option<String>,
    pub topic: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: None,
            topic: "llm-responses".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SystemPromptPath(pub String);

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-opus-20240229".to_string(),
            max_tokens: 1024,
            temperature: 0.8,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
        }
    }
}

impl Default for SystemPromptPath {
    fn default() -> Self {
        Self("config/system-message.txt".to_string())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // The bare, unprefixed variables common in deployments still work.
        if app_config.anthropic.api_key.is_none() {
            app_config.anthropic.api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        if app_config.queue.url.is_none() {
            app_config.queue.url = std::env::var("RABBITMQ_URL").ok();
        }

        Ok(app_config)
    }
}
