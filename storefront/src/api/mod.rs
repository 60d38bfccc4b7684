//! HTTP API handlers.
//!
//! Handlers parse the request, dispatch actions through the shared store and
//! answer with a view computed from the resulting state. Mutating endpoints
//! also return a `next` route the client should show.

pub mod cart;
pub mod checkout;
pub mod events;
pub mod session;
pub mod tickets;

use crate::error::StorefrontError;
use crate::routes::Route;
use crate::server::AppState;
use loket_web::AppError;
use serde::Serialize;

/// A response body paired with the page to show next.
#[derive(Debug, Serialize)]
pub struct Navigation<T> {
    /// The response body
    #[serde(flatten)]
    pub body: T,
    /// Where the client goes next
    pub next: Route,
}

impl<T> Navigation<T> {
    /// Pairs `body` with `next`
    pub const fn new(body: T, next: Route) -> Self {
        Self { body, next }
    }
}

/// Fails with 401 and `Location: /login` without a session.
pub(crate) async fn require_session(state: &AppState) -> Result<(), AppError> {
    if state.read(|s| s.is_authenticated).await {
        Ok(())
    } else {
        Err(StorefrontError::LoginRequired.into())
    }
}

/// Fails with 409 while a payment is running, the cart is locked until it ends.
pub(crate) async fn require_idle_checkout(state: &AppState) -> Result<(), AppError> {
    if state.read(|s| s.checkout.is_in_flight()).await {
        Err(StorefrontError::CheckoutInProgress.into())
    } else {
        Ok(())
    }
}
