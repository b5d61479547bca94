//! # pay-core
//!
//! Core types and traits for the payments service.
//!
//! This crate provides:
//! - `PaymentSessionRequest` and `CheckoutSession` for the checkout flow
//! - `PaymentSucceededEvent`, the message emitted for confirmed charges
//! - `EventPublisher` trait for the message bus
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{PaymentSessionRequest, SessionItem};
//!
//! let request = PaymentSessionRequest {
//!     currency: "usd".into(),
//!     order_id: "ord-1".into(),
//!     items: vec![SessionItem::new("Widget", 19.99, 2)],
//! };
//! request.validate()?;
//!
//! assert_eq!(request.items[0].unit_amount(), 1999);
//! ```

pub mod error;
pub mod event;
pub mod publisher;
pub mod session;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{PaymentSucceededEvent, PAYMENT_SUCCEEDED_TOPIC};
pub use publisher::{to_payload, EventPublisher, SharedPublisher};
pub use session::{
    to_minor_units, CheckoutSession, PaymentSessionRequest, RedirectUrls, SessionItem,
};
