//! # payments-ms
//!
//! Stripe checkout sessions and payment confirmations over NATS.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET=sk_test_...
//! export STRIPE_ENDPOINT_SECRET=whsec_...
//! export STRIPE_SUCCESS_URL=https://shop.example/payments/success
//! export STRIPE_CANCEL_URL=https://shop.example/payments/cancel
//! export NATS_SERVERS=nats://localhost:4222
//!
//! # Run the server
//! payments-ms
//! ```

use pay_api::{routes, AppConfig, AppState, LogFormat};
use pay_core::SharedPublisher;
use pay_nats::{NatsConfig, NatsPublisher};
use pay_stripe::{StripeCheckout, StripeConfig, REQUIRED_WEBHOOK_EVENTS};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing settings abort startup before anything is bound
    let config = AppConfig::from_env()?;
    let stripe_config = StripeConfig::from_env()?;
    let nats_config = NatsConfig::from_env()?;

    init_tracing(config.log_format);

    let addr = config.socket_addr()?;

    if stripe_config.is_test_mode() {
        info!("Stripe: test mode");
    } else {
        warn!("Stripe: live mode");
    }
    info!("Webhook events expected: {:?}", REQUIRED_WEBHOOK_EVENTS);

    let publisher = NatsPublisher::connect(&nats_config).await?;
    let checkout = StripeCheckout::new(stripe_config)?;

    let state = AppState::new(
        checkout,
        Arc::new(publisher.clone()) as SharedPublisher,
        config.urls.clone(),
    );

    let emits = state.emits.clone();
    let app = routes::create_router(state);

    info!("payments-ms starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let detached emits reach the client, then push its buffer out
    emits.close();
    info!("Waiting for {} pending emits", emits.len());
    emits.wait().await;

    if let Err(e) = publisher.flush().await {
        error!("Failed to flush NATS on shutdown: {}", e);
    }

    info!("payments-ms stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
