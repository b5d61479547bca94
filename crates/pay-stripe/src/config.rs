//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! All secrets are loaded from environment variables.

use pay_core::PaymentError;
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Default webhook timestamp tolerance, matching Stripe's SDKs
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Webhook endpoint signing secret (whsec_...)
    pub webhook_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Maximum age of a webhook signature timestamp, in seconds
    pub webhook_tolerance_secs: i64,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[redacted]")
            .field("webhook_secret", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .finish()
    }
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET`
    /// - `STRIPE_ENDPOINT_SECRET`
    ///
    /// Optional:
    /// - `STRIPE_API_BASE` (e.g. a local stripe-mock)
    /// - `STRIPE_WEBHOOK_TOLERANCE_SECS`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PaymentError::Configuration(format!("{} not set", key)))
        };

        let secret_key = required("STRIPE_SECRET")?;
        let webhook_secret = required("STRIPE_ENDPOINT_SECRET")?;

        let webhook_tolerance_secs = match lookup("STRIPE_WEBHOOK_TOLERANCE_SECS") {
            Some(raw) => raw.trim().parse::<i64>().ok().filter(|t| *t > 0).ok_or_else(|| {
                PaymentError::Configuration(format!(
                    "STRIPE_WEBHOOK_TOLERANCE_SECS must be a positive integer, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_WEBHOOK_TOLERANCE_SECS,
        };

        let mut config = Self::new(secret_key, webhook_secret);
        config.webhook_tolerance_secs = webhook_tolerance_secs;
        if let Some(base) = lookup("STRIPE_API_BASE").filter(|v| !v.trim().is_empty()) {
            config = config.with_api_base_url(base);
        }

        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET", "sk_test_abc123"),
            ("STRIPE_ENDPOINT_SECRET", "whsec_secret"),
        ]))
        .unwrap();

        assert!(config.is_test_mode());
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert_eq!(config.webhook_tolerance_secs, 300);
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = StripeConfig::from_lookup(lookup_from(&[(
            "STRIPE_ENDPOINT_SECRET",
            "whsec_secret",
        )]))
        .unwrap_err();

        assert!(err.to_string().contains("STRIPE_SECRET not set"));
    }

    #[test]
    fn test_blank_endpoint_secret_fails() {
        let result = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET", "sk_test_abc123"),
            ("STRIPE_ENDPOINT_SECRET", "   "),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET", "sk_live_abc123"),
            ("STRIPE_ENDPOINT_SECRET", "whsec_secret"),
            ("STRIPE_API_BASE", "http://localhost:12111/"),
            ("STRIPE_WEBHOOK_TOLERANCE_SECS", "600"),
        ]))
        .unwrap();

        assert!(!config.is_test_mode());
        assert_eq!(config.api_base_url, "http://localhost:12111");
        assert_eq!(config.webhook_tolerance_secs, 600);
    }

    #[test]
    fn test_bad_tolerance_fails() {
        let result = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET", "sk_test_abc123"),
            ("STRIPE_ENDPOINT_SECRET", "whsec_secret"),
            ("STRIPE_WEBHOOK_TOLERANCE_SECS", "soon"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123", "whsec_secret");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StripeConfig::new("sk_test_abc123", "whsec_secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk_test_abc123"));
        assert!(!debug.contains("whsec_secret"));
    }
}
