//! Provider trait for LLM implementations

use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{GenerateRequest, Generation},
};

/// Main interface that all model server clients must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a complete response for the given prompt
    ///
    /// # Arguments
    /// * `request` - The rendered prompt and generation parameters
    ///
    /// # Returns
    /// The generated text, or an error if the server could not produce one
    async fn generate(&self, request: GenerateRequest) -> Result<Generation, LlmError>;

    /// Check that the model server is reachable
    async fn health_check(&self) -> Result<(), LlmError>;

    /// Name of the model this provider talks to
    fn model(&self) -> &str;
}
