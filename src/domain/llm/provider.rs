use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

use super::StreamRequest;
use crate::domain::DomainError;

/// Lazy sequence of text chunks from one upstream streaming call.
///
/// Chunks arrive in upstream order and each is yielded exactly once. The
/// upstream connection stays open until the stream is exhausted or dropped;
/// dropping it early releases the connection.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Capability implemented by every upstream LLM adapter.
///
/// A returned stream is finite and not restartable. No idle timeout is
/// enforced; a hung upstream hangs the corresponding client stream.
#[async_trait]
pub trait StreamingProvider: Send + Sync + Debug {
    /// Open one upstream streaming call scoped to this request.
    ///
    /// Errors raised before the first chunk surface here or as the first
    /// stream item; later failures arrive as `Err` items mid-stream.
    async fn create_stream(&self, request: StreamRequest) -> Result<TextStream, DomainError>;

    /// Name embedded in error messages ("anthropic", "Ollama")
    fn provider_name(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::mock::MockStreamingProvider;
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_yields_chunks_in_order() {
        let provider = MockStreamingProvider::new("anthropic").with_chunks(["a", "b", "c"]);

        let request = StreamRequest::builder().user("hi").model("m").build();
        let mut stream = provider.create_stream(request).await.unwrap();

        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            collected.push_str(&chunk.unwrap());
        }
        assert_eq!(collected, "abc");
    }

    #[tokio::test]
    async fn test_mock_error_before_stream() {
        let provider = MockStreamingProvider::new("Ollama").with_error("connection reset");

        let request = StreamRequest::builder().user("hi").model("m").build();
        let err = provider.create_stream(request).await.map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
