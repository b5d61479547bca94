//! # Stripe Webhook Handling
//!
//! Turns a signed webhook delivery into a typed event.
//! An event can only be obtained through [`StripeWebhook::construct_event`],
//! so every value downstream of it has passed signature verification.

use crate::config::StripeConfig;
use crate::signature::verify_signature;
use chrono::Utc;
use pay_core::{PaymentError, PaymentResult, PaymentSucceededEvent};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Metadata key the checkout session stores the order id under
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

/// Events that must be enabled on the Stripe webhook endpoint
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &["charge.succeeded"];

/// Verifies deliveries for one webhook endpoint
#[derive(Clone)]
pub struct StripeWebhook {
    secret: String,
    tolerance_secs: i64,
}

impl StripeWebhook {
    pub fn new(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    pub fn from_config(config: &StripeConfig) -> Self {
        Self::new(config.webhook_secret.clone(), config.webhook_tolerance_secs)
    }

    /// Verify the signature over the raw body, then parse the event.
    pub fn construct_event(&self, payload: &[u8], signature: &str) -> PaymentResult<VerifiedEvent> {
        self.construct_event_at(payload, signature, Utc::now().timestamp())
    }

    /// Same as [`construct_event`](Self::construct_event) with an explicit clock.
    #[instrument(skip(self, payload, signature), fields(bytes = payload.len()))]
    pub fn construct_event_at(
        &self,
        payload: &[u8],
        signature: &str,
        now: i64,
    ) -> PaymentResult<VerifiedEvent> {
        verify_signature(payload, signature, &self.secret, self.tolerance_secs, now)?;

        let event: RawEvent = serde_json::from_slice(payload).map_err(|e| {
            PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
        })?;

        debug!("Verified Stripe webhook: id={}, type={}", event.id, event.event_type);

        Ok(VerifiedEvent {
            id: event.id,
            event_type: event.event_type,
            object: event.data.object,
        })
    }
}

/// A webhook event whose signature has been verified
#[derive(Debug, Clone)]
pub struct VerifiedEvent {
    id: String,
    event_type: String,
    object: serde_json::Value,
}

impl VerifiedEvent {
    /// Stripe event id (`evt_...`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw event type, e.g. `charge.succeeded`
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Classify the event into the kinds this service acts on.
    pub fn into_kind(self) -> StripeEventKind {
        match self.event_type.as_str() {
            "charge.succeeded" => StripeEventKind::ChargeSucceeded(SucceededCharge {
                event_id: self.id,
                object: self.object,
            }),
            _ => StripeEventKind::Unhandled {
                event_id: self.id,
                event_type: self.event_type,
            },
        }
    }
}

/// Closed set of event kinds; anything new lands in `Unhandled` until it gets
/// its own variant.
#[derive(Debug, Clone)]
pub enum StripeEventKind {
    ChargeSucceeded(SucceededCharge),
    Unhandled { event_id: String, event_type: String },
}

/// `data.object` of a verified `charge.succeeded` event
#[derive(Debug, Clone)]
pub struct SucceededCharge {
    event_id: String,
    object: serde_json::Value,
}

impl SucceededCharge {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Map the charge onto the bus message.
    ///
    /// Fails if the charge has no id, no order id in its metadata, or no
    /// receipt URL.
    pub fn to_payment_succeeded(&self) -> PaymentResult<PaymentSucceededEvent> {
        let charge: ChargeObject = serde_json::from_value(self.object.clone()).map_err(|e| {
            PaymentError::WebhookParseError(format!("Invalid charge object: {}", e))
        })?;

        let order_id = charge
            .metadata
            .get(ORDER_ID_METADATA_KEY)
            .cloned()
            .ok_or_else(|| {
                PaymentError::WebhookParseError(format!(
                    "Charge {} has no {} in metadata",
                    charge.id, ORDER_ID_METADATA_KEY
                ))
            })?;

        let receipt_url = charge.receipt_url.ok_or_else(|| {
            PaymentError::WebhookParseError(format!("Charge {} has no receipt_url", charge.id))
        })?;

        Ok(PaymentSucceededEvent {
            stripe_payment_id: charge.id,
            order_id,
            receipt_url,
        })
    }
}

/// Webhook event handler trait
///
/// One method per [`StripeEventKind`] variant.
pub trait WebhookHandler: Send + Sync {
    /// Called for a verified `charge.succeeded`
    fn on_charge_succeeded(&self, charge: SucceededCharge) -> PaymentResult<()>;

    /// Called for event types this service does not act on
    fn on_unhandled_event(&self, event_id: &str, event_type: &str) -> PaymentResult<()> {
        info!(event_id, event_type, "Event {} not handled", event_type);
        Ok(())
    }
}

/// Dispatch a verified event to the appropriate handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: VerifiedEvent,
) -> PaymentResult<()> {
    match event.into_kind() {
        StripeEventKind::ChargeSucceeded(charge) => handler.on_charge_succeeded(charge),
        StripeEventKind::Unhandled {
            event_id,
            event_type,
        } => handler.on_unhandled_event(&event_id, &event_type),
    }
}

// =============================================================================
// Stripe Event Types
// =============================================================================

// Only the body's JSON shape is checked; a signed event missing any of these
// still verifies and is classified by whatever it does carry.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    event_type: String,
    #[serde(default)]
    data: RawEventData,
}

#[derive(Debug, Default, Deserialize)]
struct RawEventData {
    #[serde(default)]
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChargeObject {
    id: String,
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    receipt_url: Option<String>,
}
