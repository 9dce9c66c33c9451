//! Infrastructure layer - adapters behind the domain seams

pub mod llm;
pub mod logging;
pub mod queue;
pub mod system_prompt;

pub use queue::AmqpQueuePublisher;
pub use system_prompt::SystemPromptResolver;
