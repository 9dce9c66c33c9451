//! Stream orchestrator: the /llm route handlers
//!
//! Each request resolves its system prompt, dispatches to a provider and
//! relays the resulting text chunks as a chunked `text/plain` body, flushing
//! every chunk as it arrives. Failures before the first chunk come back as
//! the structured `ServiceError` envelope; failures after bytes have been
//! flushed terminate the connection abruptly - there is no structured channel
//! left once chunked transfer has begun, so callers must treat stream
//! truncation as failure.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::StreamExt;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ChatStreamRequest, Json, OllamaChatRequest, ServiceError};
use crate::domain::{DomainError, StreamRequest, StreamingProvider, TextStream};

/// POST /llm/anthropic
pub async fn stream_anthropic(
    State(state): State<AppState>,
    Json(request): Json<ChatStreamRequest>,
) -> Result<Response, ServiceError> {
    let request_id = Uuid::new_v4().to_string();
    request.validate()?;

    info!(
        request_id = %request_id,
        provider = "anthropic",
        messages = request.messages.len(),
        "Processing stream request"
    );

    let system = state.system_prompt.resolve(request.system.clone()).await;
    let model = request
        .model
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| state.defaults.anthropic_model.clone());

    let stream_request = StreamRequest::builder()
        .messages(request.messages)
        .maybe_system(system)
        .model(model)
        .max_tokens(
            request
                .max_tokens
                .unwrap_or(state.defaults.anthropic_max_tokens),
        )
        .temperature(
            request
                .temperature
                .unwrap_or(state.defaults.anthropic_temperature),
        )
        .build();

    open_stream(state.anthropic.as_ref(), stream_request).await
}

/// POST /llm/ollama
pub async fn stream_ollama(
    State(state): State<AppState>,
    Json(request): Json<OllamaChatRequest>,
) -> Result<Response, ServiceError> {
    let request_id = Uuid::new_v4().to_string();
    request.validate()?;

    info!(
        request_id = %request_id,
        provider = "Ollama",
        messages = request.messages.len(),
        "Processing stream request"
    );

    let stream_request = build_ollama_request(&state, request).await;
    open_stream(state.ollama.as_ref(), stream_request).await
}

/// POST /llm/ollama/mq
///
/// Queued delivery: the whole stream is drained into memory first, then the
/// complete output is handed to the queue publisher in one payload, and the
/// caller gets a synchronous acknowledgement. Any failure - draining or
/// publishing - is returned as its plain string form in a 200 body; this
/// route is fire-and-forget and deliberately does not use the ServiceError
/// envelope, matching the contract existing consumers depend on.
pub async fn publish_ollama(
    State(state): State<AppState>,
    Json(request): Json<OllamaChatRequest>,
) -> Result<Response, ServiceError> {
    let request_id = Uuid::new_v4().to_string();
    request.validate()?;

    info!(
        request_id = %request_id,
        provider = "Ollama",
        topic = %state.queue_topic,
        "Processing queued stream request"
    );

    let stream_request = build_ollama_request(&state, request).await;

    let reply = match drain_and_publish(&state, stream_request).await {
        Ok(()) => "OK".to_string(),
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Queued delivery failed");
            e.to_string()
        }
    };

    Ok(reply.into_response())
}

async fn build_ollama_request(state: &AppState, request: OllamaChatRequest) -> StreamRequest {
    let system = state.system_prompt.resolve(request.system.clone()).await;
    let model = request
        .model
        .unwrap_or_else(|| state.defaults.ollama_model.clone());

    let mut builder = StreamRequest::builder()
        .messages(request.messages)
        .maybe_system(system)
        .model(model);

    if let Some(temperature) = request.temperature {
        builder = builder.temperature(temperature);
    }

    builder.build()
}

/// Open the upstream stream and wrap it as the HTTP response body. Errors
/// raised before the first chunk map to the envelope with the provider name
/// embedded; nothing has been flushed yet at that point.
async fn open_stream(
    provider: &dyn StreamingProvider,
    request: StreamRequest,
) -> Result<Response, ServiceError> {
    let stream = provider.create_stream(request).await.map_err(|e| {
        error!(
            provider = provider.provider_name(),
            error = %e,
            "Failed to open upstream stream"
        );
        ServiceError::stream_failure(provider.provider_name(), &e)
    })?;

    Ok(text_stream_response(stream))
}

/// One flush per upstream chunk, no batching. When the client disconnects,
/// axum drops this body, which drops the upstream stream and releases the
/// provider connection.
fn text_stream_response(stream: TextStream) -> Response {
    let body = Body::from_stream(
        stream.map(|chunk| chunk.map(Bytes::from).map_err(std::io::Error::other)),
    );

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Materialize the entire stream before touching the queue, so the publisher
/// never sees partial output.
async fn drain_and_publish(state: &AppState, request: StreamRequest) -> Result<(), DomainError> {
    let queue = state
        .queue
        .as_ref()
        .ok_or_else(|| DomainError::queue("Queue publisher is not configured"))?;

    let mut stream = state.ollama.create_stream(request).await?;

    let mut payload = String::new();
    while let Some(chunk) = stream.next().await {
        payload.push_str(&chunk?);
    }

    queue.publish(&state.queue_topic, &payload).await
}
