use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Queue error: {message}")]
    Queue { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn queue(message: impl Into<String>) -> Self {
        Self::Queue {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("Anthropic API key is not set.");
        assert_eq!(
            error.to_string(),
            "Configuration error: Anthropic API key is not set."
        );
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("anthropic", "connection reset");
        assert_eq!(
            error.to_string(),
            "Provider error: anthropic - connection reset"
        );
    }

    #[test]
    fn test_queue_error() {
        let error = DomainError::queue("broker unreachable");
        assert_eq!(error.to_string(), "Queue error: broker unreachable");
    }
}
