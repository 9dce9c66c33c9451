//! Domain layer - core types and the seams the gateway is built around

mod error;
pub mod llm;
pub mod queue;

pub use error::DomainError;
pub use llm::{
    ContentBlock, ImageDataFormat, ImageMediaType, ImageSource, Message, MessageRole,
    StreamRequest, StreamRequestBuilder, StreamingProvider, TextStream,
};
pub use queue::QueuePublisher;
