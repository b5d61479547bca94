//! # Payment Relay
//!
//! Webhook handler that forwards confirmed charges to the message bus.

use pay_core::{to_payload, PaymentResult, SharedPublisher};
use pay_stripe::{SucceededCharge, WebhookHandler};
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Emits a `payment.succeeded` message for every verified charge
pub struct PaymentRelay {
    publisher: SharedPublisher,
    emits: TaskTracker,
}

impl PaymentRelay {
    /// Publishes are spawned on `emits` so shutdown can wait for them.
    pub fn new(publisher: SharedPublisher, emits: TaskTracker) -> Self {
        Self { publisher, emits }
    }
}

impl WebhookHandler for PaymentRelay {
    /// Fire-and-forget: the publish runs on its own task and the webhook
    /// response does not wait for it.
    fn on_charge_succeeded(&self, charge: SucceededCharge) -> PaymentResult<()> {
        let event = charge.to_payment_succeeded()?;
        let payload = to_payload(&event)?;
        let topic = event.topic();
        let publisher = self.publisher.clone();
        let event_id = charge.event_id().to_string();

        info!(
            event_id = %event_id,
            order_id = %event.order_id,
            stripe_payment_id = %event.stripe_payment_id,
            "Emitting {}", topic
        );

        self.emits.spawn(async move {
            if let Err(e) = publisher.publish(topic, payload).await {
                error!(
                    event_id = %event_id,
                    transport = publisher.transport_name(),
                    "Failed to publish {}: {}", topic, e
                );
            }
        });

        Ok(())
    }
}
