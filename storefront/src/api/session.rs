//! Session endpoints:
//! - POST /api/login - Mock login, any credentials
//! - POST /api/register - Mock registration
//! - POST /api/logout - End the session
//! - GET /api/session - Current session
//! - POST /api/dispatch - Dispatch a raw tagged action

use super::Navigation;
use crate::actions::StorefrontAction;
use crate::auth::{self, LoginForm, RegisterForm};
use crate::routes::Route;
use crate::server::AppState;
use crate::types::User;
use axum::{extract::State, http::StatusCode, Json};
use loket_web::{AppError, WebResult};
use serde::Serialize;

/// The current session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Whether someone is logged in
    pub is_authenticated: bool,
    /// Who
    pub user: Option<User>,
    /// Tickets in the cart
    pub cart_count: u32,
}

/// Result of a raw dispatch.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    /// Whether the action type is one the reducer handles
    pub handled: bool,
}

async fn session_view(state: &AppState) -> SessionView {
    state
        .read(|s| SessionView {
            is_authenticated: s.is_authenticated,
            user: s.user.clone(),
            cart_count: s.cart.iter().fold(0, |acc, i| acc.saturating_add(i.quantity)),
        })
        .await
}

/// Log in.
///
/// # Errors
///
/// 422 for a blank email or password.
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> WebResult<Json<Navigation<SessionView>>> {
    let user = auth::login(&form, state.store.environment().ids.as_ref())?;
    tracing::info!(user_id = %user.id, "Login");
    state.dispatch([StorefrontAction::Login(user)]).await?;
    Ok(Json(Navigation::new(session_view(&state).await, Route::Events)))
}

/// Register and log in.
///
/// # Errors
///
/// 422 for a blank field or a mismatched password confirmation.
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> WebResult<Json<Navigation<SessionView>>> {
    let user = auth::register(&form, state.store.environment().ids.as_ref())?;
    tracing::info!(user_id = %user.id, "Registered");
    state.dispatch([StorefrontAction::Login(user)]).await?;
    Ok(Json(Navigation::new(session_view(&state).await, Route::Events)))
}

/// Log out. The cart is emptied.
///
/// # Errors
///
/// 503 once the store is shutting down.
pub async fn logout(State(state): State<AppState>) -> WebResult<Json<Navigation<SessionView>>> {
    state.dispatch([StorefrontAction::Logout]).await?;
    Ok(Json(Navigation::new(session_view(&state).await, Route::Login)))
}

/// Get the current session.
pub async fn current_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(session_view(&state).await)
}

/// Dispatch a raw `{"type": ..., "payload": ...}` action.
///
/// Unknown types are accepted and change nothing.
///
/// # Errors
///
/// 400 when a known type carries a malformed payload.
pub async fn dispatch(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> WebResult<(StatusCode, Json<DispatchResponse>)> {
    let action = StorefrontAction::from_json(raw)
        .map_err(|e| AppError::bad_request(format!("Malformed action: {e}")))?;
    let handled = action != StorefrontAction::Unknown;
    if !handled {
        tracing::debug!("Ignoring unknown action type");
    }

    state.dispatch([action]).await?;
    Ok((StatusCode::ACCEPTED, Json(DispatchResponse { handled })))
}
