//! LLM domain models and the streaming provider capability

mod message;
mod provider;
mod request;

pub use message::{ContentBlock, ImageDataFormat, ImageMediaType, ImageSource, Message, MessageRole};
pub use provider::{StreamingProvider, TextStream};
pub use request::{StreamRequest, StreamRequestBuilder};

#[cfg(test)]
pub use provider::mock::MockStreamingProvider;
