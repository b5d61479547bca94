//! # NATS Publisher
//!
//! [`EventPublisher`] backed by a NATS core connection.

use crate::config::NatsConfig;
use crate::envelope::EventEnvelope;
use async_nats::Client;
use async_trait::async_trait;
use pay_core::{EventPublisher, PaymentError, PaymentResult};
use tracing::{debug, info};
use uuid::Uuid;

/// Publishes events to NATS subjects named after their topic
#[derive(Clone)]
pub struct NatsPublisher {
    client: Client,
}

impl NatsPublisher {
    /// Connect to the configured servers
    pub async fn connect(config: &NatsConfig) -> PaymentResult<Self> {
        info!(servers = config.servers.len(), name = %config.name, "Connecting to NATS");

        let client = async_nats::ConnectOptions::new()
            .name(&config.name)
            .connect(config.servers.as_slice())
            .await
            .map_err(|e| PaymentError::MessageBus(format!("NATS connect failed: {}", e)))?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Flush buffered messages to the server.
    pub async fn flush(&self) -> PaymentResult<()> {
        self.client
            .flush()
            .await
            .map_err(|e| PaymentError::MessageBus(e.to_string()))
    }
}

#[async_trait]
impl EventPublisher for NatsPublisher {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> PaymentResult<()> {
        let body = EventEnvelope::new(topic, payload).encode()?;
        let message_id = Uuid::new_v4().to_string();

        let mut headers = async_nats::HeaderMap::new();
        headers.insert("Nats-Msg-Id", message_id.as_str());
        headers.insert("content-type", "application/json");

        debug!(subject = topic, message_id = %message_id, "Publishing message to NATS");

        self.client
            .publish_with_headers(topic.to_string(), headers, body.into())
            .await
            .map_err(|e| PaymentError::MessageBus(e.to_string()))
    }

    fn transport_name(&self) -> &'static str {
        "nats"
    }
}
