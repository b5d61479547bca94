//! # pay-stripe
//!
//! Stripe integration for the payments service.
//!
//! 1. **StripeCheckout** - Checkout Sessions API
//!    - Dynamic line items priced in minor units
//!    - Order id carried on the payment intent metadata
//!
//! 2. **StripeWebhook** - signed webhook deliveries
//!    - `Stripe-Signature` verification over the raw body
//!    - Typed dispatch through [`WebhookHandler`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::{StripeCheckout, StripeConfig};
//! use pay_core::RedirectUrls;
//!
//! let checkout = StripeCheckout::new(StripeConfig::from_env()?)?;
//! let session = checkout
//!     .create_payment_session(&request, &RedirectUrls::new(success, cancel))
//!     .await?;
//!
//! // Redirect user to session.url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_stripe::{dispatch_webhook_event, StripeWebhook, SucceededCharge, WebhookHandler};
//!
//! struct MyHandler;
//!
//! impl WebhookHandler for MyHandler {
//!     fn on_charge_succeeded(&self, charge: SucceededCharge) -> PaymentResult<()> {
//!         let paid = charge.to_payment_succeeded()?;
//!         println!("Order {} paid!", paid.order_id);
//!         Ok(())
//!     }
//! }
//!
//! // In your webhook endpoint:
//! let event = webhook.construct_event(&raw_body, signature)?;
//! dispatch_webhook_event(&MyHandler, event)?;
//! ```

pub mod checkout;
pub mod config;
pub mod signature;
pub mod webhook;

// Re-exports
pub use checkout::StripeCheckout;
pub use config::StripeConfig;
pub use signature::{generate_test_header, verify_signature};
pub use webhook::{
    dispatch_webhook_event, StripeEventKind, StripeWebhook, SucceededCharge, VerifiedEvent,
    WebhookHandler, REQUIRED_WEBHOOK_EVENTS,
};
