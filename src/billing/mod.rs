//! Stripe billing: payment intents, webhook verification and the price list

pub mod pricing;
pub mod stripe;
pub mod webhook;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pricing::{pricing, Plan, Pricing};
pub use stripe::{StripeClient, StripeConfig};
pub use webhook::{parse_event, sign_payload, verify_webhook, WebhookEvent, WEBHOOK_TOLERANCE_SECS};

#[derive(Debug, Error)]
pub enum BillingError {
    /// Stripe keys are not configured
    #[error("Payment processing is not configured")]
    NotConfigured,

    /// Stripe rejected the request
    #[error("Stripe error: {0}")]
    Stripe(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for BillingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BillingError::InvalidPayload(err.to_string())
        } else {
            BillingError::Connection(err.to_string())
        }
    }
}

/// Parameters for a new PaymentIntent
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentRequest {
    /// Amount in the currency's smallest unit
    pub amount_cents: i64,
    pub currency: String,
    /// Key/value pairs stored on the intent and echoed back in webhook events
    pub metadata: Vec<(String, String)>,
}

/// A PaymentIntent as returned by Stripe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}

/// Payment provider seam
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, BillingError>;
}
