//! Catalog endpoints:
//! - GET /api/events - List events, optionally by type
//! - GET /api/events/:id - Event detail with tiers
//! - POST /api/events/:id/booking - Turn a tier selection into cart lines

use super::{require_idle_checkout, Navigation};
use crate::booking::{plan_booking, BookingMode, TicketSelection};
use crate::server::AppState;
use crate::types::{EventId, EventType, Money, TicketTypeId};
use crate::views::{EventDetailView, EventSummaryView};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use loket_web::WebResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query parameters for listing events.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    /// Only events of this type
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
}

/// A booking from the event page.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    /// Which button was pressed
    pub mode: BookingMode,
    /// Quantity per tier
    #[serde(default)]
    pub selection: BTreeMap<TicketTypeId, u32>,
}

/// What was booked, after clamping to availability.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Tickets added to the cart
    pub ticket_count: u32,
    /// Their price at current tier prices
    pub total: Money,
}

/// List events.
///
/// ```bash
/// curl http://localhost:8080/api/events?type=concert
/// ```
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Json<Vec<EventSummaryView>> {
    let events = state
        .read(|s| {
            s.catalog
                .filter(query.event_type)
                .map(EventSummaryView::from)
                .collect()
        })
        .await;
    Json(events)
}

/// Get one event.
///
/// # Errors
///
/// 404 for an unknown event id.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> WebResult<Json<EventDetailView>> {
    let view = state
        .read(|s| s.catalog.require_event(&id).map(EventDetailView::from))
        .await?;
    Ok(Json(view))
}

/// Book tickets for one event.
///
/// Quantities above what a tier has left are clamped. `book_now` replaces the
/// cart and points at checkout; `add_to_cart` keeps the cart and points at it.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events/evt-jazz-gunung/booking \
///   -H "Content-Type: application/json" \
///   -d '{"mode": "book_now", "selection": {"vip": 2}}'
/// ```
///
/// # Errors
///
/// - 404 for an unknown event or tier
/// - 401 without a session
/// - 409 while a payment is running
/// - 422 for an empty selection
pub async fn book(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Json(request): Json<BookingRequest>,
) -> WebResult<Json<Navigation<BookingResponse>>> {
    let (event, authenticated) = state
        .read(|s| (s.catalog.require_event(&id).cloned(), s.is_authenticated))
        .await;
    let event = event?;

    let mut selection = TicketSelection::new(&event);
    for (tier, quantity) in &request.selection {
        selection.set(&event, tier, *quantity)?;
    }

    let plan = plan_booking(&event, &selection, request.mode, authenticated)?;
    require_idle_checkout(&state).await?;
    tracing::info!(
        event_id = %event.id,
        mode = ?request.mode,
        tickets = selection.ticket_count(),
        "Booking dispatched"
    );
    state.dispatch(plan.actions).await?;

    Ok(Json(Navigation::new(
        BookingResponse {
            ticket_count: selection.ticket_count(),
            total: selection.total(&event),
        },
        plan.next,
    )))
}
