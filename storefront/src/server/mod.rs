//! HTTP server module for the storefront.
//!
//! This module provides the Axum-based HTTP server with:
//! - Application state management
//! - Router configuration
//! - Store construction from [`Config`](crate::Config)

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;

use crate::environment::StorefrontEnvironment;
use crate::payment_gateway::SimulatedGateway;
use crate::reducer::StorefrontReducer;
use crate::state::StorefrontState;
use crate::{Config, StorefrontStore};
use loket_core::environment::{SystemClock, UuidGenerator};
use std::sync::Arc;

/// Builds the production store: seeded catalog, system clock, random ids and
/// a simulated gateway with the configured latencies.
#[must_use]
pub fn build_store(config: &Config) -> StorefrontStore {
    let environment = StorefrontEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(UuidGenerator),
        SimulatedGateway::shared(config.checkout.latency()),
    )
    .with_service_fee_bps(config.checkout.service_fee_bps)
    .with_payment_timeout(config.checkout.payment_timeout());

    StorefrontStore::with_config(
        StorefrontState::seeded(),
        StorefrontReducer::new(),
        environment,
        config.store_config(),
    )
}
