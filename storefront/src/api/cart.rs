//! Cart endpoints:
//! - GET /api/cart - Priced cart
//! - POST /api/cart - Add a line (overwrites an existing line's quantity)
//! - PATCH /api/cart/:event_id/:ticket_type_id - Change a quantity, 0 removes
//! - DELETE /api/cart/:event_id/:ticket_type_id - Remove a line
//! - DELETE /api/cart - Empty the cart

use super::{require_idle_checkout, require_session, Navigation};
use crate::actions::StorefrontAction;
use crate::cart::{change_quantity, CartView};
use crate::error::StorefrontError;
use crate::routes::Route;
use crate::server::AppState;
use crate::types::{CartItem, CartKey, EventId, TicketTypeId};
use axum::{
    extract::{Path, State},
    Json,
};
use loket_web::{AppError, WebResult};
use serde::Deserialize;

/// Request to add a cart line.
///
/// The unit price is taken from the catalog, never from the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// Event
    pub event_id: EventId,
    /// Tier
    pub ticket_type_id: TicketTypeId,
    /// Number of tickets
    pub quantity: u32,
}

/// Request to change a line's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New quantity
    pub quantity: u32,
}

async fn cart_view(state: &AppState) -> CartView {
    let fee_bps = state.service_fee_bps();
    state.read(|s| CartView::build(s, fee_bps)).await
}

/// Get the cart.
pub async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    Json(cart_view(&state).await)
}

/// Add a line to the cart.
///
/// # Errors
///
/// - 401 without a session
/// - 404 for an unknown event or tier
/// - 409 while a payment is running
/// - 422 for a zero quantity or one above what is left
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> WebResult<Json<Navigation<CartView>>> {
    require_session(&state).await?;
    require_idle_checkout(&state).await?;
    if request.quantity == 0 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }

    let key = CartKey::new(request.event_id, request.ticket_type_id);
    let item = state
        .read(|s| {
            let (_, tier) = s.catalog.resolve(&key)?;
            if request.quantity > tier.available {
                return Err(StorefrontError::InsufficientAvailability {
                    event_id: key.event_id.clone(),
                    ticket_type_id: key.ticket_type_id.clone(),
                    requested: request.quantity,
                    available: tier.available,
                });
            }
            Ok(CartItem {
                event_id: key.event_id.clone(),
                ticket_type_id: key.ticket_type_id.clone(),
                quantity: request.quantity,
                price: tier.price,
            })
        })
        .await?;

    state.dispatch([StorefrontAction::AddToCart(item)]).await?;
    Ok(Json(Navigation::new(cart_view(&state).await, Route::Cart)))
}

/// Change the quantity of a line. Zero removes it.
///
/// # Errors
///
/// - 404 when the cart has no such line
/// - 409 while a payment is running
pub async fn update_line(
    State(state): State<AppState>,
    Path((event_id, ticket_type_id)): Path<(EventId, TicketTypeId)>,
    Json(request): Json<UpdateQuantityRequest>,
) -> WebResult<Json<Navigation<CartView>>> {
    let key = CartKey::new(event_id, ticket_type_id);
    require_line(&state, &key).await?;
    require_idle_checkout(&state).await?;

    state.dispatch([change_quantity(key, request.quantity)]).await?;
    Ok(Json(Navigation::new(cart_view(&state).await, Route::Cart)))
}

/// Remove a line.
///
/// # Errors
///
/// - 404 when the cart has no such line
/// - 409 while a payment is running
pub async fn remove_line(
    State(state): State<AppState>,
    Path((event_id, ticket_type_id)): Path<(EventId, TicketTypeId)>,
) -> WebResult<Json<Navigation<CartView>>> {
    let key = CartKey::new(event_id, ticket_type_id);
    require_line(&state, &key).await?;
    require_idle_checkout(&state).await?;

    state.dispatch([StorefrontAction::RemoveFromCart(key)]).await?;
    Ok(Json(Navigation::new(cart_view(&state).await, Route::Cart)))
}

/// Empty the cart.
///
/// # Errors
///
/// - 409 while a payment is running
/// - 503 once the store is shutting down
pub async fn clear_cart(State(state): State<AppState>) -> WebResult<Json<Navigation<CartView>>> {
    require_idle_checkout(&state).await?;
    state.dispatch([StorefrontAction::ClearCart]).await?;
    Ok(Json(Navigation::new(cart_view(&state).await, Route::Events)))
}

async fn require_line(state: &AppState, key: &CartKey) -> Result<(), AppError> {
    if state.read(|s| s.cart_line(key).is_some()).await {
        Ok(())
    } else {
        Err(AppError::not_found(
            "Cart line",
            format!("{}/{}", key.event_id, key.ticket_type_id),
        ))
    }
}
