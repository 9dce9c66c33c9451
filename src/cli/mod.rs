//! CLI module for the LLM Chat Gateway
//!
//! A single `serve` subcommand runs the HTTP gateway.

pub mod serve;

use clap::{Parser, Subcommand};

/// LLM Chat Gateway - streaming chat endpoints over Anthropic and Ollama
#[derive(Parser)]
#[command(name = "llm-chat-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the gateway server
    Serve,
}
