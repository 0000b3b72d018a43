//! Ollama-specific request and response types
//!
//! These types map directly to the `/api/generate` and `/api/tags` schemas.

use serde::{Deserialize, Serialize};

use crate::llm::core::config::GenerationConfig;

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaGenerateRequest {
    /// Model name, e.g. `gemma:2b-instruct`
    pub model: String,
    /// Fully rendered prompt
    pub prompt: String,
    /// Always false; the service returns whole replies
    pub stream: bool,
    /// Sampling options
    pub options: GenerationConfig,
}

/// Non-streaming response of `POST /api/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaGenerateResponse {
    /// Model that answered
    #[serde(default)]
    pub model: String,
    /// Generated text
    #[serde(default)]
    pub response: String,
    /// Whether generation finished
    #[serde(default)]
    pub done: bool,
    /// Prompt tokens evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u32>,
    /// Tokens generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u32>,
}

/// Error body returned by Ollama on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaErrorResponse {
    pub error: String,
}

/// Response of `GET /api/tags`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModelTag>,
}

/// One locally available model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaModelTag {
    pub name: String,
}
