//! Axum integration for Loket stores.
//!
//! Handlers stay thin: they parse the request, build an action, dispatch it
//! through a `Store`, and map the resulting state (or error) to a response.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from request (JSON, path, query)
//! 3. **Build Action** from extracted data
//! 4. **Dispatch** action through `Store`
//! 5. **Map result** to HTTP response ([`AppError`] on failure)
//!
//! # Example
//!
//! ```ignore
//! use loket_web::{AppError, WebResult};
//! use axum::{extract::State, Json};
//!
//! async fn clear_cart(State(state): State<AppState>) -> WebResult<Json<usize>> {
//!     state.store.send(StorefrontAction::ClearCart).await?;
//!     Ok(Json(state.store.state(|s| s.cart.len()).await))
//! }
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{correlation_id_layer, CorrelationId, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
