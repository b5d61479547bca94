//! # Event Publisher Trait
//!
//! Capability to put a message on the internal bus.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          EventPublisher (trait)          │
//! │  └── publish(topic, payload)             │
//! └──────────────────────────────────────────┘
//!                      ▲
//!          ┌───────────┴───────────┐
//!  ┌───────┴───────┐       ┌───────┴───────┐
//!  │ NatsPublisher │       │  test doubles │
//!  │  (pay-nats)   │       │               │
//!  └───────────────┘       └───────────────┘
//! ```

use crate::error::{PaymentError, PaymentResult};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Publishes JSON payloads to named topics.
///
/// One process-wide instance is shared by every request handler, so
/// implementations must be cheap to call concurrently.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `payload` on `topic`.
    ///
    /// Returning `Ok` means the message was handed to the transport, not that
    /// any consumer received it.
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> PaymentResult<()>;

    /// Transport name (for logging).
    fn transport_name(&self) -> &'static str;
}

/// Type alias for a shared publisher (dynamic dispatch)
pub type SharedPublisher = Arc<dyn EventPublisher>;

/// Serialize a typed event into the payload form `publish` accepts.
pub fn to_payload<T: Serialize>(event: &T) -> PaymentResult<serde_json::Value> {
    serde_json::to_value(event).map_err(|e| PaymentError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PaymentSucceededEvent;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<(String, serde_json::Value)>>,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, topic: &str, payload: serde_json::Value) -> PaymentResult<()> {
            self.sent.lock().unwrap().push((topic.to_string(), payload));
            Ok(())
        }

        fn transport_name(&self) -> &'static str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_publish_through_trait_object() {
        let recorder = Arc::new(RecordingPublisher::default());
        let publisher: SharedPublisher = recorder.clone();

        let event = PaymentSucceededEvent {
            stripe_payment_id: "ch_1".to_string(),
            order_id: "ord-1".to_string(),
            receipt_url: "https://r".to_string(),
        };
        publisher
            .publish(event.topic(), to_payload(&event).unwrap())
            .await
            .unwrap();

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "payment.succeeded");
        assert_eq!(sent[0].1["stripePaymentId"], "ch_1");
    }
}
