//! # pay-nats
//!
//! NATS transport for events emitted by the payments service.
//!
//! ```rust,ignore
//! use pay_nats::{NatsConfig, NatsPublisher};
//! use pay_core::EventPublisher;
//!
//! let publisher = NatsPublisher::connect(&NatsConfig::from_env()?).await?;
//! publisher.publish("payment.succeeded", payload).await?;
//! ```

pub mod config;
pub mod envelope;
pub mod publisher;

pub use config::NatsConfig;
pub use envelope::EventEnvelope;
pub use publisher::NatsPublisher;
