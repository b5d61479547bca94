//! # Bus Envelope
//!
//! Wire format for events, compatible with NestJS microservice consumers:
//!
//! ```json
//! {"pattern":"payment.succeeded","data":{"stripePaymentId":"ch_1", ...}}
//! ```

use pay_core::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Event packet as NestJS `ClientProxy::emit` puts it on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub pattern: String,
    pub data: serde_json::Value,
}

impl EventEnvelope {
    pub fn new(pattern: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            pattern: pattern.into(),
            data,
        }
    }

    pub fn encode(&self) -> PaymentResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| PaymentError::Serialization(e.to_string()))
    }
}
