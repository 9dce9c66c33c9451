//! API layer - HTTP endpoints and the stream orchestrator

pub mod health;
pub mod llm;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::{AppState, RequestDefaults};
