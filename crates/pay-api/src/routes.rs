//! # Routes
//!
//! Axum router configuration for the payments API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST /payments/create-payment-session - Open a Stripe checkout session
/// - POST /payments/webhook - Stripe webhook (raw body, signed)
/// - GET  /payments/success - Post-checkout landing
/// - GET  /payments/cancel - Abandoned-checkout landing
/// - GET  /health - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new()
        .route(
            "/create-payment-session",
            post(handlers::create_payment_session),
        )
        .route("/webhook", post(handlers::stripe_webhook))
        .route("/success", get(handlers::payment_success))
        .route("/cancel", get(handlers::payment_cancelled));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/payments", payment_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
