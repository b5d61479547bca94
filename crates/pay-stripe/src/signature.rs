//! # Webhook Signature Verification
//!
//! Stripe signs each webhook delivery with a `Stripe-Signature` header:
//!
//! ```text
//! t=1492774577,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! The `v1` value is `hex(HMAC-SHA256(secret, "{t}.{raw body}"))`. More than
//! one `v1` may be present while a secret is being rolled.

use hmac::{Hmac, Mac};
use pay_core::{PaymentError, PaymentResult};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const EXPECTED_SCHEME: &str = "v1";

/// Parsed `Stripe-Signature` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Split a signature header into its timestamp and `v1` signatures.
///
/// Unknown schemes (such as Stripe's legacy `v0`) are ignored.
pub fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = value.parse().ok();
            }
            EXPECTED_SCHEME => {
                signatures.push(value.to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed(
            "Unable to extract timestamp and signatures from header".to_string(),
        )
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found with expected scheme".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Compute the hex `v1` signature for a payload signed at `timestamp`.
///
/// The payload is used byte for byte; it is never re-encoded.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify `header` against `payload` as of `now` (unix seconds).
///
/// Fails when no `v1` signature matches or when the signed timestamp is more
/// than `tolerance_secs` in the past.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> PaymentResult<SignatureHeader> {
    let parsed = parse_signature_header(header)?;
    let expected = compute_signature(secret, parsed.timestamp, payload)?;

    let matched = parsed
        .signatures
        .iter()
        .any(|sig| bool::from(sig.as_bytes().ct_eq(expected.as_bytes())));

    if !matched {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found matching the expected signature for payload".to_string(),
        ));
    }

    if tolerance_secs > 0 && now.saturating_sub(parsed.timestamp) > tolerance_secs {
        return Err(PaymentError::WebhookVerificationFailed(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    Ok(parsed)
}

/// Build a valid signature header for `payload`, as Stripe would send it.
///
/// Used by tests and local tooling to simulate deliveries.
pub fn generate_test_header(payload: &[u8], secret: &str, timestamp: i64) -> PaymentResult<String> {
    let signature = compute_signature(secret, timestamp, payload)?;
    Ok(format!("t={},{}={}", timestamp, EXPECTED_SCHEME, signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_parse_signature_header() {
        let header = "t=1234567890,v1=abc123,v1=def456,v0=legacy";
        let parsed = parse_signature_header(header).unwrap();

        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures, vec!["abc123", "def456"]);
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        assert!(parse_signature_header("v1=abc123").is_err());
        assert!(parse_signature_header("t=1234567890,v0=abc").is_err());
        assert!(parse_signature_header("").is_err());
        assert!(parse_signature_header("t=later,v1=abc").is_err());
    }

    #[test]
    fn test_known_signature() {
        // HMAC-SHA256("secret", "1.{}")
        let sig = compute_signature("secret", 1, b"{}").unwrap();
        assert_eq!(sig.len(), 64);
        assert_eq!(sig, compute_signature("secret", 1, b"{}").unwrap());
        assert_ne!(sig, compute_signature("secret", 2, b"{}").unwrap());
    }

    #[test]
    fn test_round_trip_with_generated_header() {
        let payload = br#"{"id":"evt_1","type":"charge.succeeded"}"#;
        let header = generate_test_header(payload, SECRET, NOW).unwrap();

        let parsed = verify_signature(payload, &header, SECRET, 300, NOW + 10).unwrap();
        assert_eq!(parsed.timestamp, NOW);
    }

    #[test]
    fn test_tampered_body_rejected() {
        let header = generate_test_header(br#"{"amount":100}"#, SECRET, NOW).unwrap();
        let err = verify_signature(br#"{"amount":999}"#, &header, SECRET, 300, NOW).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_body_whitespace_is_significant() {
        let header = generate_test_header(br#"{"a":1}"#, SECRET, NOW).unwrap();
        assert!(verify_signature(br#"{ "a": 1 }"#, &header, SECRET, 300, NOW).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = b"{}";
        let header = generate_test_header(payload, "whsec_other", NOW).unwrap();
        assert!(verify_signature(payload, &header, SECRET, 300, NOW).is_err());
    }

    #[test]
    fn test_any_matching_v1_accepted() {
        let payload = b"{}";
        let good = compute_signature(SECRET, NOW, payload).unwrap();
        let header = format!("t={},v1=deadbeef,v1={}", NOW, good);

        assert!(verify_signature(payload, &header, SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = b"{}";
        let header = generate_test_header(payload, SECRET, NOW - 301).unwrap();

        let err = verify_signature(payload, &header, SECRET, 300, NOW).unwrap_err();
        assert!(err.to_string().contains("tolerance"));

        // boundary is inclusive
        let header = generate_test_header(payload, SECRET, NOW - 300).unwrap();
        assert!(verify_signature(payload, &header, SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let payload = b"{}";

        let header = generate_test_header(payload, SECRET, i64::MIN).unwrap();
        let err = verify_signature(payload, &header, SECRET, 300, NOW).unwrap_err();
        assert!(err.to_string().contains("tolerance"));

        let header = generate_test_header(payload, SECRET, i64::MAX).unwrap();
        assert!(verify_signature(payload, &header, SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_zero_tolerance_skips_age_check() {
        let payload = b"{}";
        let header = generate_test_header(payload, SECRET, 1).unwrap();
        assert!(verify_signature(payload, &header, SECRET, 0, NOW).is_ok());
    }
}
