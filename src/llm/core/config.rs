//! Generation configuration parameters

use serde::{Deserialize, Serialize};

/// Sampling parameters sent to the model server.
///
/// Serializes directly into the Ollama `options` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Randomness (0.0-1.0, higher = more random)
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub num_predict: u32,
}

impl GenerationConfig {
    /// Create a new configuration with the specified token limit
    pub fn new(num_predict: u32) -> Self {
        Self {
            num_predict,
            ..Default::default()
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            num_predict: 500,
        }
    }
}
