//! # Checkout Session Types
//!
//! Request and response shapes for hosted checkout sessions.
//! Field names follow the camelCase JSON used by the calling services.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// A single purchasable item in a session request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionItem {
    /// Display name shown on the hosted checkout page
    pub name: String,

    /// Unit price in major currency units (e.g. dollars)
    pub price: f64,

    /// Quantity, at least 1
    pub quantity: u32,
}

impl SessionItem {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Unit price in minor currency units
    pub fn unit_amount(&self) -> i64 {
        to_minor_units(self.price)
    }
}

/// Request to open a hosted checkout session for an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    /// ISO 4217 currency code, passed through to the gateway as-is
    pub currency: String,

    /// Order this payment belongs to; round-trips through charge metadata
    pub order_id: String,

    /// Items to charge for, in display order
    pub items: Vec<SessionItem>,
}

impl PaymentSessionRequest {
    /// Check the request before anything is sent to the gateway.
    pub fn validate(&self) -> PaymentResult<()> {
        if self.currency.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "currency must not be empty".to_string(),
            ));
        }

        if self.order_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "orderId must not be empty".to_string(),
            ));
        }

        if self.items.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "items must contain at least one item".to_string(),
            ));
        }

        for (i, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(PaymentError::InvalidRequest(format!(
                    "items[{}].name must not be empty",
                    i
                )));
            }
            if !item.price.is_finite() || item.price <= 0.0 {
                return Err(PaymentError::InvalidPrice {
                    message: format!("items[{}].price must be a positive amount", i),
                });
            }
            if item.quantity == 0 {
                return Err(PaymentError::InvalidRequest(format!(
                    "items[{}].quantity must be at least 1",
                    i
                )));
            }
        }

        Ok(())
    }
}

/// Redirect URLs returned by the gateway for a created session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Where the customer returns if they abandon checkout
    pub cancel_url: Option<String>,

    /// Where the customer lands after paying
    pub success_url: Option<String>,

    /// Hosted checkout page (redirect the customer here)
    pub url: String,
}

/// Configured post-checkout redirect targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    pub fn new(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }
}

/// Convert a major-unit amount to minor units: `round(amount * 100)`.
///
/// The multiplication happens in binary floating point, so amounts that are
/// not exactly representable can land just below a half and round down
/// (`1.005` becomes `100`). Exact halves round away from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_request() -> PaymentSessionRequest {
        PaymentSessionRequest {
            currency: "usd".to_string(),
            order_id: "ord-1".to_string(),
            items: vec![SessionItem::new("Widget", 19.99, 2)],
        }
    }

    #[test]
    fn test_minor_unit_rounding() {
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(10.0), 1000);
        assert_eq!(to_minor_units(0.01), 1);
        // 0.125 * 100 is exactly 12.5
        assert_eq!(to_minor_units(0.125), 13);
        // lossy: 1.005 * 100 == 100.49999999999999
        assert_eq!(to_minor_units(1.005), 100);
    }

    #[test]
    fn test_item_unit_amount() {
        let item = SessionItem::new("Widget", 19.99, 2);
        assert_eq!(item.unit_amount(), 1999);
    }

    #[test]
    fn test_request_json_shape() {
        let request: PaymentSessionRequest = serde_json::from_str(
            r#"{"currency":"usd","orderId":"ord-1","items":[{"name":"Widget","price":19.99,"quantity":2}]}"#,
        )
        .unwrap();

        assert_eq!(request, widget_request());
    }

    #[test]
    fn test_valid_request() {
        assert!(widget_request().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_items() {
        let mut request = widget_request();
        request.items.clear();

        let err = request.validate().unwrap_err();
        assert!(matches!(err, PaymentError::InvalidRequest(_)));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        for price in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut request = widget_request();
            request.items[0].price = price;

            let err = request.validate().unwrap_err();
            assert!(matches!(err, PaymentError::InvalidPrice { .. }), "{}", price);
        }
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let mut request = widget_request();
        request.items[0].quantity = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_rejects_missing_order_id() {
        let mut request = widget_request();
        request.order_id = "  ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_checkout_session_json_keys() {
        let session = CheckoutSession {
            cancel_url: Some("https://shop.test/cancel".to_string()),
            success_url: Some("https://shop.test/success".to_string()),
            url: "https://checkout.stripe.com/c/pay/cs_test_1".to_string(),
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["cancelUrl"], "https://shop.test/cancel");
        assert_eq!(json["successUrl"], "https://shop.test/success");
        assert_eq!(json["url"], "https://checkout.stripe.com/c/pay/cs_test_1");
    }
}
