use async_trait::async_trait;

use crate::domain::DomainError;

/// Opaque publish sink for the queued delivery mode.
///
/// The payload is the fully materialized stream output; publish starts only
/// once the whole response is buffered, so the queue never sees partial data.
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), DomainError>;
}
