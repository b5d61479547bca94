//! # pay-api
//!
//! HTTP API layer for the payments service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout session endpoint
//! - Stripe webhook endpoint relaying confirmed charges to the message bus
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payments/create-payment-session` | Create checkout session |
//! | POST | `/payments/webhook` | Stripe webhook |
//! | GET | `/payments/success` | Checkout success landing |
//! | GET | `/payments/cancel` | Checkout cancel landing |

pub mod handlers;
pub mod relay;
pub mod routes;
pub mod state;

pub use relay::PaymentRelay;
pub use routes::create_router;
pub use state::{AppConfig, AppState, LogFormat};
