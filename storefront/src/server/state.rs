//! Application state for the storefront HTTP server.

use crate::actions::StorefrontAction;
use crate::state::StorefrontState;
use crate::StorefrontStore;
use axum::extract::FromRef;
use loket_runtime::metrics::PrometheusMetrics;
use loket_web::AppError;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// The one store every handler dispatches through
    pub store: Arc<StorefrontStore>,
    /// Recorder rendered at `/metrics`
    pub metrics: PrometheusMetrics,
    /// How long `POST /api/checkout` waits for the payment outcome
    pub checkout_timeout: Duration,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(
        store: Arc<StorefrontStore>,
        metrics: PrometheusMetrics,
        checkout_timeout: Duration,
    ) -> Self {
        Self {
            store,
            metrics,
            checkout_timeout,
        }
    }

    /// Reads the current state through `f`
    pub async fn read<T>(&self, f: impl FnOnce(&StorefrontState) -> T) -> T {
        self.store.state(f).await
    }

    /// Dispatches actions in order, without waiting for their effects.
    ///
    /// # Errors
    ///
    /// Returns 503 once the store is shutting down.
    pub async fn dispatch(
        &self,
        actions: impl IntoIterator<Item = StorefrontAction>,
    ) -> Result<(), AppError> {
        for action in actions {
            self.store.send(action).await?;
        }
        Ok(())
    }

    /// Service fee configured on the store's environment
    #[must_use]
    pub fn service_fee_bps(&self) -> u32 {
        self.store.environment().service_fee_bps
    }
}

// Lets the framework's readiness handler extract the store directly
impl FromRef<AppState> for Arc<StorefrontStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}
