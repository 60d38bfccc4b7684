//! Storefront HTTP server.
//!
//! Serves the catalog, cart, checkout and ticket API over one in-memory store.

use loket_runtime::metrics::PrometheusMetrics;
use loket_storefront::{
    metrics::register_business_metrics,
    server::{build_router, build_store, AppState},
    Config,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Loket storefront");
    info!(
        service_fee_bps = config.checkout.service_fee_bps,
        checkout_timeout_secs = config.checkout.timeout_secs,
        "Configuration loaded"
    );

    let metrics = PrometheusMetrics::install()?;
    register_business_metrics();

    let store = Arc::new(build_store(&config));
    let state = AppState::new(store.clone(), metrics, config.checkout.timeout());
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let running payments finish before exiting
    if let Err(e) = store.shutdown(config.shutdown_timeout()).await {
        warn!(error = %e, "Store did not drain before the shutdown timeout");
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
