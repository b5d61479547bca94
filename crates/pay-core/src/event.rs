//! # Bus Events
//!
//! Messages this service emits onto the internal message bus.

use serde::{Deserialize, Serialize};

/// Topic for confirmed charges
pub const PAYMENT_SUCCEEDED_TOPIC: &str = "payment.succeeded";

/// A charge confirmed by a signature-verified gateway webhook.
///
/// Only ever built from a verified `charge.succeeded` event; ownership passes
/// to the publisher on emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceededEvent {
    /// Gateway charge id (`ch_...`)
    pub stripe_payment_id: String,

    /// Order id carried through charge metadata
    pub order_id: String,

    /// Hosted receipt page for the charge
    pub receipt_url: String,
}

impl PaymentSucceededEvent {
    pub fn topic(&self) -> &'static str {
        PAYMENT_SUCCEEDED_TOPIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let event = PaymentSucceededEvent {
            stripe_payment_id: "ch_1".to_string(),
            order_id: "ord-1".to_string(),
            receipt_url: "https://r".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "stripePaymentId": "ch_1",
                "orderId": "ord-1",
                "receiptUrl": "https://r"
            })
        );
        assert_eq!(event.topic(), "payment.succeeded");
    }
}
