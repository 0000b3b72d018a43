// /api/payment endpoints

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::billing::{
    parse_event, pricing, verify_webhook, BillingError, PaymentIntentRequest, WebhookEvent,
    WEBHOOK_TOLERANCE_SECS,
};
use crate::error::ApiError;
use crate::models::{CreatePaymentIntentRequest, PaymentIntentResponse, StatusResponse};
use crate::state::SharedState;
use crate::store::{NewPayment, PaymentStatus, User};

pub async fn create_payment_intent_handler(
    user: User,
    request: CreatePaymentIntentRequest,
    state: SharedState,
) -> Result<Response, Rejection> {
    let gateway = state
        .payments
        .clone()
        .ok_or_else(|| ApiError::from(BillingError::NotConfigured))?;

    if request.amount <= 0 {
        return Err(ApiError::Unprocessable("Amount must be positive".to_string()).into());
    }
    let currency = request.currency.trim().to_lowercase();
    if currency.len() != 3 {
        return Err(
            ApiError::Unprocessable("Currency must be a three-letter ISO code".to_string()).into(),
        );
    }

    let intent = gateway
        .create_payment_intent(PaymentIntentRequest {
            amount_cents: request.amount,
            currency: currency.clone(),
            metadata: vec![
                ("user_id".to_string(), user.id.to_string()),
                ("subscription_type".to_string(), request.subscription_type.clone()),
            ],
        })
        .await
        .map_err(ApiError::from)?;

    state
        .store
        .create_payment(NewPayment {
            user_id: user.id,
            stripe_payment_intent_id: intent.id.clone(),
            amount_cents: request.amount,
            currency,
        })
        .await
        .map_err(ApiError::from)?;

    info!(
        user_id = user.id,
        payment_intent = %intent.id,
        amount = request.amount,
        "Payment intent created"
    );

    let body = PaymentIntentResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
    };
    Ok(warp::reply::json(&body).into_response())
}

pub async fn webhook_handler(
    signature: Option<String>,
    payload: Bytes,
    state: SharedState,
) -> Result<Response, Rejection> {
    let secret = state
        .config
        .stripe_webhook_secret
        .as_deref()
        .ok_or_else(|| ApiError::from(BillingError::NotConfigured))?;
    let signature = signature.ok_or_else(|| {
        ApiError::from(BillingError::InvalidSignature("missing header".to_string()))
    })?;

    let now = Utc::now().timestamp();
    if let Err(e) = verify_webhook(&payload, &signature, secret, now, WEBHOOK_TOLERANCE_SECS) {
        warn!(error = %e, "Rejected webhook");
        return Err(ApiError::from(e).into());
    }

    match parse_event(&payload).map_err(ApiError::from)? {
        WebhookEvent::PaymentSucceeded { payment_intent_id } => {
            let payment = state
                .store
                .update_payment_status(&payment_intent_id, PaymentStatus::Succeeded)
                .await
                .map_err(ApiError::from)?;
            match payment {
                Some(payment) => {
                    state
                        .store
                        .grant_premium(payment.user_id, &payment_intent_id)
                        .await
                        .map_err(ApiError::from)?;
                    info!(
                        user_id = payment.user_id,
                        payment_intent = %payment_intent_id,
                        "Payment succeeded, premium granted"
                    );
                }
                None => warn!(
                    payment_intent = %payment_intent_id,
                    "Succeeded event for unknown payment"
                ),
            }
        }
        WebhookEvent::PaymentFailed { payment_intent_id } => {
            let payment = state
                .store
                .update_payment_status(&payment_intent_id, PaymentStatus::Failed)
                .await
                .map_err(ApiError::from)?;
            match payment {
                Some(payment) => info!(
                    user_id = payment.user_id,
                    payment_intent = %payment_intent_id,
                    "Payment failed"
                ),
                None => warn!(
                    payment_intent = %payment_intent_id,
                    "Failed event for unknown payment"
                ),
            }
        }
        WebhookEvent::Ignored { kind } => debug!(event = %kind, "Ignoring webhook event"),
    }

    let body = StatusResponse {
        status: "success".to_string(),
    };
    Ok(warp::reply::json(&body).into_response())
}

pub async fn pricing_handler() -> Result<Response, Rejection> {
    Ok(warp::reply::json(&pricing()).into_response())
}
