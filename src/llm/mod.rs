//! LLM Abstraction Layer
//!
//! A small interface over an external model server. The only production
//! implementation talks to Ollama (self-hosted or Ollama Cloud).

pub mod core;
pub mod ollama;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::LlmProvider,
    types::{GenerateRequest, Generation, UsageMetadata},
};

pub use ollama::{OllamaClient, OllamaConfig};
