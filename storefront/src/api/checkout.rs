//! Checkout endpoints:
//! - GET /api/checkout - Order summary for the checkout page
//! - POST /api/checkout - Pay for the cart and wait for the outcome
//! - POST /api/checkout/abort - Abort the running payment
//! - GET /api/booking-confirmation - Latest tickets after a purchase

use super::{require_session, Navigation};
use crate::actions::StorefrontAction;
use crate::cart::CartView;
use crate::error::StorefrontError;
use crate::payment_gateway::PaymentReceipt;
use crate::routes::Route;
use crate::server::AppState;
use crate::types::{CheckoutAttempt, PaymentDetails};
use crate::views::ConfirmationView;
use axum::{extract::State, Json};
use loket_web::{AppError, WebResult};
use serde::Serialize;

/// The checkout page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    /// Priced cart
    #[serde(flatten)]
    pub cart: CartView,
    /// Whether a payment is running
    pub in_flight: bool,
}

/// A completed purchase.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Attempt that completed
    pub attempt: CheckoutAttempt,
    /// Gateway receipt
    pub receipt: PaymentReceipt,
    /// Confirmation page content
    pub confirmation: ConfirmationView,
}

/// Result of an abort request.
#[derive(Debug, Serialize)]
pub struct AbortResponse {
    /// Attempt that was aborted, `null` when nothing was running
    pub aborted: Option<CheckoutAttempt>,
}

/// Get the checkout page.
///
/// # Errors
///
/// - 401 without a session
/// - 409 with `Location: /cart` for an empty cart
pub async fn summary(State(state): State<AppState>) -> WebResult<Json<CheckoutView>> {
    require_session(&state).await?;

    let fee_bps = state.service_fee_bps();
    let view = state
        .read(|s| CheckoutView {
            cart: CartView::build(s, fee_bps),
            in_flight: s.checkout.is_in_flight(),
        })
        .await;

    if view.cart.is_empty() {
        return Err(StorefrontError::EmptyCart.into());
    }
    Ok(Json(view))
}

/// Pay for the cart.
///
/// Dispatches CHECKOUT under a fresh attempt id and waits until that attempt
/// succeeds, fails, is rejected or is aborted.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/checkout \
///   -H "Content-Type: application/json" \
///   -d '{"method": "e_wallet", "provider": "gopay"}'
/// ```
///
/// # Errors
///
/// - 401 without a session
/// - 409 for an empty cart, a running payment or an aborted payment
/// - 422 for incomplete card details or too few tickets left
/// - 402 when the gateway declines
/// - 408 when no outcome arrives in time
pub async fn checkout(
    State(state): State<AppState>,
    Json(payment): Json<PaymentDetails>,
) -> WebResult<Json<Navigation<CheckoutResponse>>> {
    let attempt = CheckoutAttempt::new();
    tracing::info!(%attempt, method = ?payment.method(), "Checkout requested");

    let outcome = state
        .store
        .send_and_wait_for(
            StorefrontAction::Checkout { attempt, payment },
            move |action| action.ends_checkout(attempt),
            state.checkout_timeout,
        )
        .await?;

    match outcome {
        StorefrontAction::PaymentSucceeded { receipt, .. } => {
            let confirmation = state
                .read(|s| {
                    s.last_confirmation
                        .as_ref()
                        .filter(|c| c.attempt == attempt)
                        .map(|_| ConfirmationView::build(s))
                        .ok_or_else(|| {
                            s.last_error.clone().unwrap_or(StorefrontError::PaymentFailed)
                        })
                })
                .await?;

            Ok(Json(Navigation::new(
                CheckoutResponse {
                    attempt,
                    receipt,
                    confirmation,
                },
                Route::BookingConfirmation,
            )))
        },
        StorefrontAction::PaymentFailed { .. } => Err(StorefrontError::PaymentFailed.into()),
        StorefrontAction::CheckoutRejected { error, .. } => Err(error.into()),
        StorefrontAction::CheckoutAborted { .. } => {
            Err(AppError::conflict("Checkout was aborted").with_location(Route::Cart.path()))
        },
        other => Err(AppError::internal(format!("Unexpected checkout outcome: {other:?}"))),
    }
}

/// Abort the running payment. The cart is kept.
///
/// Answers with the attempt this request aborted, `null` when nothing was
/// running as it was applied. Overlapping requests each see their own answer.
///
/// # Errors
///
/// 408 when the abort is not acknowledged in time.
pub async fn abort(State(state): State<AppState>) -> WebResult<Json<Navigation<AbortResponse>>> {
    let outcome = state
        .store
        .send_and_wait_with(
            StorefrontAction::AbortCheckout,
            |s| {
                let running = s.checkout.attempt();
                move |action: &StorefrontAction| match action {
                    StorefrontAction::CheckoutAborted { attempt } => *attempt == running,
                    _ => false,
                }
            },
            state.checkout_timeout,
        )
        .await?;

    let aborted = match outcome {
        StorefrontAction::CheckoutAborted { attempt } => attempt,
        _ => None,
    };
    Ok(Json(Navigation::new(AbortResponse { aborted }, Route::Cart)))
}

/// Get the booking confirmation page.
///
/// # Errors
///
/// 401 without a session.
pub async fn confirmation(State(state): State<AppState>) -> WebResult<Json<ConfirmationView>> {
    require_session(&state).await?;
    Ok(Json(state.read(ConfirmationView::build).await))
}
