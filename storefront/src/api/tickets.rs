//! Ticket endpoints:
//! - GET /api/tickets - Active tickets and history
//! - GET /api/tickets/:id/qr - QR dialog content
//! - POST /api/tickets/:id/cancel - Cancel an active ticket

use super::{require_session, Navigation};
use crate::actions::StorefrontAction;
use crate::error::StorefrontError;
use crate::routes::Route;
use crate::server::AppState;
use crate::types::TicketId;
use crate::views::{QrView, TicketsView};
use axum::{
    extract::{Path, State},
    Json,
};
use loket_web::WebResult;

/// List the session's tickets.
///
/// # Errors
///
/// 401 without a session.
pub async fn list_tickets(State(state): State<AppState>) -> WebResult<Json<TicketsView>> {
    require_session(&state).await?;
    Ok(Json(state.read(TicketsView::build).await))
}

/// QR content for one ticket.
///
/// # Errors
///
/// - 401 without a session
/// - 404 for an unknown ticket
pub async fn qr_code(
    State(state): State<AppState>,
    Path(id): Path<TicketId>,
) -> WebResult<Json<QrView>> {
    require_session(&state).await?;
    let view = state
        .read(|s| {
            s.ticket(&id)
                .map(QrView::from)
                .ok_or(StorefrontError::TicketNotFound { ticket_id: id.clone() })
        })
        .await?;
    Ok(Json(view))
}

/// Cancel a ticket. Cancelling a ticket that is no longer active changes
/// nothing.
///
/// # Errors
///
/// - 401 without a session
/// - 404 for an unknown ticket
pub async fn cancel_ticket(
    State(state): State<AppState>,
    Path(id): Path<TicketId>,
) -> WebResult<Json<Navigation<TicketsView>>> {
    require_session(&state).await?;
    if state.read(|s| s.ticket(&id).is_none()).await {
        return Err(StorefrontError::TicketNotFound { ticket_id: id }.into());
    }

    state.dispatch([StorefrontAction::CancelTicket(id)]).await?;
    Ok(Json(Navigation::new(
        state.read(TicketsView::build).await,
        Route::Tickets,
    )))
}
