//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the Stripe clients, the bus publisher and redirect URLs.

use pay_core::{PaymentError, RedirectUrls, SharedPublisher};
use pay_stripe::{StripeCheckout, StripeWebhook};
use std::env;
use std::net::SocketAddr;
use tokio_util::task::TaskTracker;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Post-checkout redirect targets
    pub urls: RedirectUrls,
    /// Log output format
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// Required: `STRIPE_SUCCESS_URL`, `STRIPE_CANCEL_URL`.
    /// Optional: `HOST` (0.0.0.0), `PORT` (3000), `LOG_FORMAT` (text).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PaymentError::Configuration(format!("{} not set", key)))
        };

        let success_url = required("STRIPE_SUCCESS_URL")?;
        let cancel_url = required("STRIPE_CANCEL_URL")?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                PaymentError::Configuration(format!("PORT must be a port number, got {:?}", raw))
            })?,
            None => 3000,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(PaymentError::Configuration(format!(
                    "LOG_FORMAT must be text or json, got {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            urls: RedirectUrls::new(success_url, cancel_url),
            log_format,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, PaymentError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| PaymentError::Configuration(format!("Invalid socket address: {}", e)))
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout Sessions client
    pub checkout: StripeCheckout,
    /// Webhook signature verifier
    pub webhook: StripeWebhook,
    /// Message bus
    pub publisher: SharedPublisher,
    /// Checkout redirect URLs
    pub urls: RedirectUrls,
    /// Detached bus publishes still in flight
    pub emits: TaskTracker,
}

impl AppState {
    pub fn new(
        checkout: StripeCheckout,
        publisher: SharedPublisher,
        urls: RedirectUrls,
    ) -> Self {
        let webhook = StripeWebhook::from_config(checkout.config());
        Self {
            checkout,
            webhook,
            publisher,
            urls,
            emits: TaskTracker::new(),
        }
    }
}
