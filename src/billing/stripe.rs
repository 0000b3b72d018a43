use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{BillingError, PaymentGateway, PaymentIntent, PaymentIntentRequest};

/// Connection settings for the Stripe API
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// Without trailing slash, e.g. `https://api.stripe.com`
    pub api_base: String,
    pub timeout: Duration,
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Extract the human readable message from a Stripe error body
fn stripe_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<StripeErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .message
            .or(parsed.error.kind)
            .unwrap_or_else(|| format!("HTTP {}", status)),
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

/// Client for the Stripe REST API
pub struct StripeClient {
    http_client: Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, BillingError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BillingError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.api_base, path)
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, BillingError> {
        let mut form = vec![
            ("amount".to_string(), request.amount_cents.to_string()),
            ("currency".to_string(), request.currency.clone()),
        ];
        for (key, value) in &request.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        debug!(
            amount = request.amount_cents,
            currency = %request.currency,
            "Creating Stripe payment intent"
        );

        let response = self
            .http_client
            .post(self.endpoint("payment_intents"))
            .bearer_auth(&self.config.secret_key)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = stripe_error_message(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %message, "Stripe rejected payment intent");
            return Err(BillingError::Stripe(message));
        }

        serde_json::from_str(&body).map_err(|e| BillingError::InvalidPayload(e.to_string()))
    }
}
