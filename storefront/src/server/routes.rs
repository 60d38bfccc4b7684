//! Router configuration for the storefront.
//!
//! Builds the complete Axum router with all endpoints.

use super::state::AppState;
use crate::api::{cart, checkout, events, session, tickets};
use crate::{StorefrontAction, StorefrontEnvironment, StorefrontReducer, StorefrontState};
use axum::{
    extract::State,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use loket_web::correlation_id_layer;
use loket_web::handlers::{health_check, health_check_with_store, render_metrics};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// Configures:
/// - Liveness, readiness and metrics endpoints
/// - The shopper API under `/api`
/// - Request tracing with a correlation id per request
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Catalog
        .route("/events", get(events::list_events))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id/booking", post(events::book))
        // Cart
        .route(
            "/cart",
            get(cart::get_cart).post(cart::add_to_cart).delete(cart::clear_cart),
        )
        .route(
            "/cart/:event_id/:ticket_type_id",
            patch(cart::update_line).delete(cart::remove_line),
        )
        // Checkout
        .route("/checkout", get(checkout::summary).post(checkout::checkout))
        .route("/checkout/abort", post(checkout::abort))
        .route("/booking-confirmation", get(checkout::confirmation))
        // Tickets
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/:id/qr", get(tickets::qr_code))
        .route("/tickets/:id/cancel", post(tickets::cancel_ticket))
        // Session
        .route("/login", post(session::login))
        .route("/register", post(session::register))
        .route("/logout", post(session::logout))
        .route("/session", get(session::current_session))
        .route("/dispatch", post(session::dispatch));

    Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route(
            "/ready",
            get(health_check_with_store::<
                StorefrontState,
                StorefrontAction,
                StorefrontEnvironment,
                StorefrontReducer,
            >),
        )
        .route("/metrics", get(metrics))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn metrics(State(state): State<AppState>) -> Response {
    render_metrics(&state.metrics)
}
