//! # Request Handlers
//!
//! Axum request handlers for the payments API.

use crate::relay::PaymentRelay;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use pay_core::{CheckoutSession, PaymentError, PaymentResult, PaymentSessionRequest};
use pay_stripe::dispatch_webhook_event;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

/// Header carrying the Stripe webhook signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Acknowledgement for a verified webhook
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub signature: String,
}

/// Rejection for a webhook that failed verification
#[derive(Debug, Serialize)]
pub struct WebhookRejection {
    pub message: String,
}

fn payment_error_to_response(err: PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// 400 for deliveries that fail verification, 500 for anything else.
fn webhook_error_to_response(err: &PaymentError) -> (StatusCode, Json<WebhookRejection>) {
    let status = if err.is_webhook_rejection() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(WebhookRejection {
            message: format!("Webhook error: {}", err),
        }),
    )
}

fn signature_from_headers(headers: &HeaderMap) -> PaymentResult<&str> {
    let value = headers.get(SIGNATURE_HEADER).ok_or_else(|| {
        PaymentError::WebhookVerificationFailed(
            "No stripe-signature header value was provided.".to_string(),
        )
    })?;

    value.to_str().map_err(|_| {
        PaymentError::WebhookVerificationFailed(
            "stripe-signature header is not valid ASCII".to_string(),
        )
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payments-ms",
        "version": env!("CARGO_PKG_VERSION"),
        "bus": state.publisher.transport_name()
    }))
}

/// Create a hosted checkout session for an order
#[instrument(skip(state, payload))]
pub async fn create_payment_session(
    State(state): State<AppState>,
    payload: Result<Json<PaymentSessionRequest>, JsonRejection>,
) -> Result<Json<CheckoutSession>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("Malformed payment session request", 400)
                    .with_details(rejection.body_text()),
            ),
        )
    })?;

    request.validate().map_err(payment_error_to_response)?;

    info!(
        order_id = %request.order_id,
        items = request.items.len(),
        "Creating payment session"
    );

    let session = state
        .checkout
        .create_payment_session(&request, &state.urls)
        .await
        .map_err(|e| {
            error!("Failed to create payment session: {}", e);
            payment_error_to_response(e)
        })?;

    Ok(Json(session))
}

/// Handle Stripe webhook
///
/// `body` is the request exactly as received; the signature is checked over
/// these bytes before any JSON parsing happens.
#[instrument(skip(state, headers, body))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, Json<WebhookRejection>)> {
    let (event, signature) = signature_from_headers(&headers)
        .and_then(|signature| Ok((state.webhook.construct_event(&body, signature)?, signature)))
        .map_err(|e| {
            warn!("Webhook rejected: {}", e);
            webhook_error_to_response(&e)
        })?;

    info!(
        event_id = event.id(),
        event_type = event.event_type(),
        "Received webhook"
    );

    // Verification succeeded, so the delivery is acknowledged even if relaying fails.
    let relay = PaymentRelay::new(state.publisher.clone(), state.emits.clone());
    if let Err(e) = dispatch_webhook_event(&relay, event) {
        warn!("Verified webhook was not relayed: {}", e);
    }

    Ok(Json(WebhookAck {
        signature: signature.to_string(),
    }))
}

/// Landing page after a completed checkout
pub async fn payment_success() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "message": "Payment successful"
    }))
}

/// Landing page after an abandoned checkout
pub async fn payment_cancelled() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": false,
        "message": "Payment cancelled"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400).with_details("items");
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert_eq!(err.details.as_deref(), Some("items"));
    }

    #[test]
    fn test_payment_error_conversion() {
        let err = PaymentError::InvalidRequest("Bad data".to_string());
        let (status, _json) = payment_error_to_response(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err = PaymentError::ProviderError {
            provider: "stripe".to_string(),
            message: "No such price".to_string(),
        };
        let (status, _json) = payment_error_to_response(err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_webhook_error_conversion() {
        let err = PaymentError::WebhookVerificationFailed("Signature mismatch".to_string());
        let (status, Json(body)) = webhook_error_to_response(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.message,
            "Webhook error: Webhook verification failed: Signature mismatch"
        );

        let err = PaymentError::WebhookParseError("expected value".to_string());
        let (status, _json) = webhook_error_to_response(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err = PaymentError::Internal("HMAC key rejected".to_string());
        let (status, _json) = webhook_error_to_response(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_signature_header_missing_vs_unreadable() {
        let mut headers = HeaderMap::new();
        let err = signature_from_headers(&headers).unwrap_err();
        assert!(err.to_string().contains("No stripe-signature header"));

        headers.insert(
            SIGNATURE_HEADER,
            axum::http::HeaderValue::from_bytes(&[0xff]).unwrap(),
        );
        let err = signature_from_headers(&headers).unwrap_err();
        assert!(err.is_webhook_rejection());
        assert!(err.to_string().contains("not valid ASCII"));

        headers.insert(SIGNATURE_HEADER, "t=1,v1=abc".parse().unwrap());
        assert_eq!(signature_from_headers(&headers).unwrap(), "t=1,v1=abc");
    }
}
