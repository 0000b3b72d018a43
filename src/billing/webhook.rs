//! Stripe webhook signatures and events
//!
//! The `Stripe-Signature` header has the form `t=<unix>,v1=<hex>[,v1=<hex>...]`.
//! Each `v1` is an HMAC-SHA256 of `"{t}.{payload}"` keyed with the endpoint's
//! signing secret.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use super::BillingError;

/// Maximum age of a signed payload
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

/// Check a webhook payload against its `Stripe-Signature` header
pub fn verify_webhook(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), BillingError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();
    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| BillingError::InvalidSignature("missing timestamp".to_string()))?;
    let issued_at: i64 = timestamp
        .parse()
        .map_err(|_| BillingError::InvalidSignature("malformed timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(BillingError::InvalidSignature("no v1 signature".to_string()));
    }

    let mac = keyed_mac(secret, timestamp, payload)?;
    let matched = signatures.iter().any(|candidate| match hex::decode(candidate) {
        Ok(expected) => mac.clone().verify_slice(&expected).is_ok(),
        Err(_) => false,
    });
    if !matched {
        return Err(BillingError::InvalidSignature("signature mismatch".to_string()));
    }

    if (now - issued_at).abs() > tolerance_secs {
        return Err(BillingError::InvalidSignature("timestamp outside tolerance".to_string()));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    data: RawEventData,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    object: RawEventObject,
}

#[derive(Debug, Deserialize)]
struct RawEventObject {
    #[serde(default)]
    id: Option<String>,
}

/// The webhook events acted upon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    PaymentSucceeded { payment_intent_id: String },
    PaymentFailed { payment_intent_id: String },
    /// Any other event type; acknowledged and ignored
    Ignored { kind: String },
}

/// Decode a verified webhook payload
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, BillingError> {
    let event: RawEvent =
        serde_json::from_slice(payload).map_err(|e| BillingError::InvalidPayload(e.to_string()))?;

    let intent_id = || {
        event
            .data
            .object
            .id
            .clone()
            .ok_or_else(|| BillingError::InvalidPayload("event object has no id".to_string()))
    };

    match event.kind.as_str() {
        "payment_intent.succeeded" => Ok(WebhookEvent::PaymentSucceeded {
            payment_intent_id: intent_id()?,
        }),
        "payment_intent.payment_failed" => Ok(WebhookEvent::PaymentFailed {
            payment_intent_id: intent_id()?,
        }),
        _ => Ok(WebhookEvent::Ignored { kind: event.kind.clone() }),
    }
}

fn keyed_mac(secret: &str, timestamp: &str, payload: &[u8]) -> Result<HmacSha256, BillingError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| BillingError::InvalidSignature(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Compute a `Stripe-Signature` header value for a payload
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, BillingError> {
    let mac = keyed_mac(secret, &timestamp.to_string(), payload)?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const PAYLOAD: &[u8] =
        br#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_123"}}}"#;

    fn verify_at(payload: &[u8], header: &str, now: i64) -> Result<(), BillingError> {
        verify_webhook(payload, header, SECRET, now, WEBHOOK_TOLERANCE_SECS)
    }

    #[test]
    fn test_accepts_valid_signature() {
        let header = sign_payload(PAYLOAD, SECRET, 1_700_000_000).unwrap();
        assert!(verify_at(PAYLOAD, &header, 1_700_000_100).is_ok());
    }

    #[test]
    fn test_accepts_any_matching_v1() {
        let signed = sign_payload(PAYLOAD, SECRET, 1_700_000_000).unwrap();
        let good = signed.split_once(",v1=").unwrap().1;
        let header = format!("t=1700000000,v1={},v1={}", "00".repeat(32), good);
        assert!(verify_at(PAYLOAD, &header, 1_700_000_000).is_ok());
    }

    #[test]
    fn test_rejects_tampered_payload() {
        let header = sign_payload(PAYLOAD, SECRET, 1_700_000_000).unwrap();
        let tampered =
            br#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_999"}}}"#;
        assert!(verify_at(tampered, &header, 1_700_000_000).is_err());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let header = sign_payload(PAYLOAD, "whsec_other", 1_700_000_000).unwrap();
        assert!(verify_at(PAYLOAD, &header, 1_700_000_000).is_err());
    }

    #[test]
    fn test_rejects_stale_timestamp() {
        let header = sign_payload(PAYLOAD, SECRET, 1_700_000_000).unwrap();
        let err = verify_at(PAYLOAD, &header, 1_700_000_301).unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_rejects_malformed_header() {
        for header in ["", "v1=abcd", "t=abc,v1=abcd", "t=1700000000"] {
            assert!(verify_at(PAYLOAD, header, 1_700_000_000).is_err());
        }
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(
            parse_event(PAYLOAD).unwrap(),
            WebhookEvent::PaymentSucceeded {
                payment_intent_id: "pi_123".to_string()
            }
        );

        let failed = br#"{"type":"payment_intent.payment_failed","data":{"object":{"id":"pi_9"}}}"#;
        assert_eq!(
            parse_event(failed).unwrap(),
            WebhookEvent::PaymentFailed {
                payment_intent_id: "pi_9".to_string()
            }
        );

        let other = br#"{"type":"customer.created","data":{"object":{"id":"cus_1"}}}"#;
        assert_eq!(
            parse_event(other).unwrap(),
            WebhookEvent::Ignored {
                kind: "customer.created".to_string()
            }
        );

        assert!(parse_event(b"not json").is_err());
    }
}
