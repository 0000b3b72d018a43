//! Ollama provider implementation
//!
//! Talks to the Ollama HTTP API, either a local `ollama serve` or Ollama Cloud.

pub mod client;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::{OllamaClient, OllamaConfig};
