//! # Stripe Checkout Sessions
//!
//! Creates hosted Checkout Sessions for one-off payments.

use crate::config::StripeConfig;
use crate::webhook::ORDER_ID_METADATA_KEY;
use pay_core::{
    CheckoutSession, PaymentError, PaymentResult, PaymentSessionRequest, RedirectUrls,
};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Client for the Stripe Checkout Sessions API
#[derive(Clone)]
pub struct StripeCheckout {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckout {
    /// Create a new checkout client
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Form fields for `POST /v1/checkout/sessions`.
    fn build_form(request: &PaymentSessionRequest, urls: &RedirectUrls) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), urls.success_url.clone()),
            ("cancel_url".to_string(), urls.cancel_url.clone()),
            (
                format!("payment_intent_data[metadata][{}]", ORDER_ID_METADATA_KEY),
                request.order_id.clone(),
            ),
        ];

        for (i, item) in request.items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                request.currency.clone(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }

    /// Open a hosted checkout session for `request`.
    ///
    /// The order id is attached to the payment intent's metadata so the
    /// resulting charge can be matched back to the order in the webhook.
    #[instrument(skip(self, request, urls), fields(order_id = %request.order_id, items = request.items.len()))]
    pub async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
        urls: &RedirectUrls,
    ) -> PaymentResult<CheckoutSession> {
        request.validate()?;

        let form_params = Self::build_form(request, urls);
        debug!(
            "Creating Stripe checkout session: {} items, currency={}",
            request.items.len(),
            request.currency
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session: StripeCheckoutSessionResponse =
            serde_json::from_str(&body).map_err(|e| {
                PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
            })?;

        let checkout_url = session.url.ok_or_else(|| PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("Session {} has no hosted URL", session.id),
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession {
            cancel_url: session.cancel_url,
            success_url: session.success_url,
            url: checkout_url,
        })
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    success_url: Option<String>,
    #[serde(default)]
    cancel_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
