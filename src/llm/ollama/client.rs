//! Ollama client implementation

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

use crate::llm::core::{
    error::LlmError,
    provider::LlmProvider,
    types::{GenerateRequest, Generation},
};

use super::mapper::{error_message, from_ollama_response, to_ollama_request};
use super::types::{OllamaGenerateResponse, OllamaTagsResponse};

/// Connection settings for an Ollama server
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:11434`
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Bearer token (Ollama Cloud)
    pub api_key: Option<String>,
    /// Timeout for a generation request
    pub request_timeout: Duration,
    /// Timeout for the availability probe
    pub health_timeout: Duration,
}

impl OllamaConfig {
    /// Create a configuration with default timeouts
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            request_timeout: Duration::from_secs(60),
            health_timeout: Duration::from_secs(5),
        }
    }

    /// Set the bearer token
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Set the generation timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for the Ollama HTTP API
pub struct OllamaClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Connection settings
    config: OllamaConfig,
}

impl OllamaClient {
    /// Create a new Ollama client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .map_err(|e| {
                LlmError::ConnectionError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Build the endpoint URL for a given API path
    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url, path)
    }

    /// Attach the bearer token when one is configured
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    async fn generate(&self, request: GenerateRequest) -> Result<Generation, LlmError> {
        let body = to_ollama_request(&self.config.model, request);
        debug!(
            model = %body.model,
            prompt_len = body.prompt.len(),
            "Sending Ollama generate request"
        );

        let response = self
            .authorize(self.http_client.post(self.endpoint("generate")))
            .timeout(self.config.request_timeout)
            .json(&body)
            .send()
            .await?;

        // Check status
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        let text = response.text().await?;
        let parsed: OllamaGenerateResponse = serde_json::from_str(&text)?;
        from_ollama_response(&self.config.model, parsed)
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let response = self
            .authorize(self.http_client.get(self.endpoint("tags")))
            .timeout(self.config.health_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        let tags: OllamaTagsResponse = response.json().await?;
        debug!(models = tags.models.len(), "Ollama tags listed");
        Ok(())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = OllamaConfig::new("http://localhost:11434/", "gemma:2b-instruct");
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.health_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_endpoint_url_format() {
        let client =
            OllamaClient::new(OllamaConfig::new("https://ollama.com", "gpt-oss:20b")).unwrap();
        assert_eq!(client.endpoint("generate"), "https://ollama.com/api/generate");
        assert_eq!(client.endpoint("tags"), "https://ollama.com/api/tags");
        assert_eq!(client.model(), "gpt-oss:20b");
    }
}
