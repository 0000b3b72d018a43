//! Process configuration loaded from the environment

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::auth::MAX_EXPIRE_MINUTES;
use crate::llm::GenerationConfig;

/// Secret used when `SECRET_KEY` is not set. Only suitable for local development.
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-change-this-in-production";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, multi-line
    Pretty,
    /// One JSON object per line
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to bind
    pub port: u16,
    /// PostgreSQL connection string; the memory store is used when absent
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections
    pub database_pool_size: usize,
    /// HMAC secret for access tokens
    pub secret_key: String,
    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,
    /// Base URL of the Ollama server (local or Ollama Cloud)
    pub ollama_base_url: String,
    /// Model name passed to Ollama
    pub ollama_model: String,
    /// Bearer token for Ollama Cloud
    pub ollama_api_key: Option<String>,
    /// Timeout for a single generation request
    pub ollama_timeout: Duration,
    /// Sampling temperature passed to Ollama
    pub ollama_temperature: f32,
    /// Token limit passed to Ollama
    pub ollama_num_predict: u32,
    /// Stripe secret API key; payment intents are disabled when absent
    pub stripe_secret_key: Option<String>,
    /// Stripe webhook signing secret; the webhook is disabled when absent
    pub stripe_webhook_secret: Option<String>,
    /// Stripe API base URL
    pub stripe_api_base: String,
    /// Origin allowed by CORS in addition to the local dev server
    pub frontend_url: String,
    /// Directory of pre-built frontend assets served under `/static`
    pub static_dir: Option<PathBuf>,
    /// Directory of UX knowledge documents
    pub knowledge_dir: Option<PathBuf>,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            database_url: None,
            database_pool_size: 16,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            access_token_expire_minutes: 30,
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "gemma:2b-instruct".to_string(),
            ollama_api_key: None,
            ollama_timeout: Duration::from_secs(60),
            ollama_temperature: 0.7,
            ollama_num_predict: 500,
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            stripe_api_base: "https://api.stripe.com".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            static_dir: None,
            knowledge_dir: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = match get("HOST") {
            Some(v) => parse(&v, "HOST")?,
            None => defaults.host,
        };
        let port = match get("PORT") {
            Some(v) => parse(&v, "PORT")?,
            None => defaults.port,
        };
        let database_pool_size = match get("DATABASE_POOL_SIZE") {
            Some(v) => parse(&v, "DATABASE_POOL_SIZE")?,
            None => defaults.database_pool_size,
        };
        let access_token_expire_minutes = match get("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(v) => parse(&v, "ACCESS_TOKEN_EXPIRE_MINUTES")?,
            None => defaults.access_token_expire_minutes,
        };
        if !(1..=MAX_EXPIRE_MINUTES).contains(&access_token_expire_minutes) {
            return Err(ConfigError::InvalidValue {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES".to_string(),
                reason: format!("must be between 1 and {}", MAX_EXPIRE_MINUTES),
            });
        }
        let ollama_timeout = match get("OLLAMA_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse(&v, "OLLAMA_TIMEOUT_SECS")?),
            None => defaults.ollama_timeout,
        };
        let ollama_temperature: f32 = match get("OLLAMA_TEMPERATURE") {
            Some(v) => parse(&v, "OLLAMA_TEMPERATURE")?,
            None => defaults.ollama_temperature,
        };
        if !(0.0..=2.0).contains(&ollama_temperature) {
            return Err(ConfigError::InvalidValue {
                name: "OLLAMA_TEMPERATURE".to_string(),
                reason: "must be between 0.0 and 2.0".to_string(),
            });
        }
        let ollama_num_predict = match get("OLLAMA_NUM_PREDICT") {
            Some(v) => parse(&v, "OLLAMA_NUM_PREDICT")?,
            None => defaults.ollama_num_predict,
        };
        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "LOG_FORMAT".to_string(),
                    reason: format!("expected 'pretty' or 'json', got '{}'", other),
                })
            }
        };

        let frontend_url = get("FRONTEND_URL").unwrap_or(defaults.frontend_url);
        if !frontend_url.starts_with("http://") && !frontend_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: "FRONTEND_URL".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            database_url: get("DATABASE_URL"),
            database_pool_size,
            secret_key: get("SECRET_KEY").unwrap_or(defaults.secret_key),
            access_token_expire_minutes,
            ollama_base_url: get("OLLAMA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.ollama_base_url),
            ollama_model: get("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            ollama_api_key: get("OLLAMA_API_KEY"),
            ollama_timeout,
            ollama_temperature,
            ollama_num_predict,
            stripe_secret_key: get("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: get("STRIPE_WEBHOOK_SECRET"),
            stripe_api_base: get("STRIPE_API_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.stripe_api_base),
            frontend_url,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            knowledge_dir: get("KNOWLEDGE_DIR").map(PathBuf::from),
            log_format,
        })
    }

    /// Socket address to bind the HTTP server to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sampling parameters for every generation request
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig::new(self.ollama_num_predict).with_temperature(self.ollama_temperature)
    }

    /// Whether the built-in development secret is in use
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Set the token signing secret
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    /// Set the Ollama base URL
    pub fn with_ollama_base_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_base_url = url.into();
        self
    }

    /// Set the Stripe webhook secret
    pub fn with_stripe_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.stripe_webhook_secret = Some(secret.into());
        self
    }
}

fn parse<T>(value: &str, name: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
