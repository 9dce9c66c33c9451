//! Uniform service error envelope

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Structured body every failed request carries:
/// `{ "message": ..., "detail": {...}, "status_code": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub message: String,
    pub detail: Map<String, Value>,
    pub status_code: u16,
}

/// Service error with HTTP status
#[derive(Debug)]
pub struct ServiceError {
    pub status: StatusCode,
    pub body: ServiceErrorBody,
}

impl ServiceError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ServiceErrorBody {
                message: message.into(),
                detail: Map::new(),
                status_code: status.as_u16(),
            },
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.detail.insert(key.into(), value.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Pre-stream provider failure, wrapped with the provider name the way
    /// callers expect it: "Failed to create stream message on {provider}: ..."
    pub fn stream_failure(provider: &str, err: &DomainError) -> Self {
        Self::internal(format!(
            "Failed to create stream message on {}: {}",
            provider, err
        ))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Configuration { message } => Self::internal(message),
            DomainError::Provider { provider, message } => {
                Self::internal(message).with_detail("provider", provider.as_str())
            }
            DomainError::Queue { message } => Self::internal(message),
            DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.body.status_code, self.body.message)
    }
}

impl std::error::Error for ServiceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_fields() {
        let err = ServiceError::internal("Service Error");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.status_code, 500);

        let json = serde_json::to_value(&err.body).unwrap();
        assert_eq!(json["message"], "Service Error");
        assert_eq!(json["status_code"], 500);
        assert!(json["detail"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_stream_failure_message_embeds_provider() {
        let cause = DomainError::provider("anthropic", "rate limited");
        let err = ServiceError::stream_failure("anthropic", &cause);

        assert!(
            err.body
                .message
                .starts_with("Failed to create stream message on anthropic:")
        );
        assert!(err.body.message.contains("rate limited"));
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: ServiceError = DomainError::provider("Ollama", "boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.detail["provider"], "Ollama");
    }

    #[test]
    fn test_bad_request_status() {
        let err = ServiceError::bad_request("Messages cannot be empty");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.status_code, 422);
    }
}
