//! Read models for the event, ticket and confirmation pages.
//!
//! Views are computed from a state snapshot on every read and carry the
//! display strings (Rupiah amounts, long dates) alongside the raw values.

use crate::format::{format_currency, format_date};
use crate::state::StorefrontState;
use crate::types::{
    Event, EventId, EventType, Money, Ticket, TicketId, TicketTier, TicketType, TicketTypeId,
};
use serde::Serialize;

/// Most recent tickets shown on the confirmation page
pub const CONFIRMATION_TICKET_LIMIT: usize = 5;

// ============================================================================
// Events
// ============================================================================

/// An event card in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummaryView {
    /// Event id
    pub id: EventId,
    /// Title
    pub title: String,
    /// Kind of event
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Long date
    pub date: String,
    /// Start time
    pub time: String,
    /// Venue
    pub location: String,
    /// Image path
    pub image: String,
    /// Cheapest tier price as Rupiah text ("" for an event without tiers)
    pub price_from: String,
    /// Whether every tier is sold out
    pub sold_out: bool,
}

impl From<&Event> for EventSummaryView {
    fn from(event: &Event) -> Self {
        let price_from = event
            .ticket_types
            .iter()
            .map(|t| t.price)
            .min()
            .map(format_currency)
            .unwrap_or_default();

        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            event_type: event.event_type,
            date: format_date(event.date),
            time: event.time.clone(),
            location: event.location.clone(),
            image: event.image.clone(),
            price_from,
            sold_out: event.ticket_types.iter().all(TicketType::is_sold_out),
        }
    }
}

/// A tier on the event page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierView {
    /// Tier id
    pub id: TicketTypeId,
    /// Tier name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Unit price as Rupiah text
    pub price_formatted: String,
    /// Tickets left
    pub available: u32,
    /// `"N left"` or `"Sold Out"`
    pub availability: String,
    /// Perks
    pub features: Vec<String>,
    /// Presentation tier
    pub tier: TicketTier,
}

impl From<&TicketType> for TierView {
    fn from(tier: &TicketType) -> Self {
        Self {
            id: tier.id.clone(),
            name: tier.name.clone(),
            price: tier.price,
            price_formatted: format_currency(tier.price),
            available: tier.available,
            availability: tier.availability_label(),
            features: tier.features.clone(),
            tier: tier.tier,
        }
    }
}

/// The event detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailView {
    /// Card fields
    #[serde(flatten)]
    pub summary: EventSummaryView,
    /// Description
    pub description: String,
    /// Venue capacity
    pub capacity: u32,
    /// Participants so far
    pub participants: u32,
    /// Tiers in display order
    pub ticket_types: Vec<TierView>,
}

impl From<&Event> for EventDetailView {
    fn from(event: &Event) -> Self {
        Self {
            summary: EventSummaryView::from(event),
            description: event.description.clone(),
            capacity: event.capacity,
            participants: event.participants,
            ticket_types: event.ticket_types.iter().map(TierView::from).collect(),
        }
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// A ticket with display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    /// The ticket
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Long event date
    pub event_date_formatted: String,
    /// Long purchase date
    pub purchase_date_formatted: String,
    /// Amount paid as Rupiah text
    pub total_price_formatted: String,
}

impl From<&Ticket> for TicketView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            ticket: ticket.clone(),
            event_date_formatted: format_date(ticket.event_date),
            purchase_date_formatted: format_date(ticket.purchase_date),
            total_price_formatted: format_currency(ticket.total_price),
        }
    }
}

/// The "my tickets" page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketsView {
    /// Tickets valid for entry
    pub active: Vec<TicketView>,
    /// Cancelled and used tickets
    pub history: Vec<TicketView>,
}

impl TicketsView {
    /// Splits the state's tickets into active and history
    #[must_use]
    pub fn build(state: &StorefrontState) -> Self {
        let (active, history): (Vec<&Ticket>, Vec<&Ticket>) =
            state.tickets.iter().partition(|t| t.is_active());

        Self {
            active: active.into_iter().map(TicketView::from).collect(),
            history: history.into_iter().map(TicketView::from).collect(),
        }
    }
}

/// What the QR dialog shows for one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrView {
    /// Ticket id
    pub ticket_id: TicketId,
    /// Token to encode
    pub qr_code: String,
    /// Event title
    pub event_title: String,
    /// Tier name
    pub ticket_type: String,
    /// Admissions
    pub quantity: u32,
    /// Long event date
    pub event_date: String,
}

impl From<&Ticket> for QrView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.id.clone(),
            qr_code: ticket.qr_code.clone(),
            event_title: ticket.event_title.clone(),
            ticket_type: ticket.ticket_type.clone(),
            quantity: ticket.quantity,
            event_date: format_date(ticket.event_date),
        }
    }
}

// ============================================================================
// Booking confirmation
// ============================================================================

/// One entry of the ticket download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDownload {
    /// Ticket id
    pub id: TicketId,
    /// Event title
    pub event: String,
    /// Tier name
    #[serde(rename = "type")]
    pub ticket_type: String,
    /// Admissions
    pub quantity: u32,
    /// QR token
    pub qr_code: String,
    /// Event date
    pub date: String,
}

/// The booking confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationView {
    /// Most recent active tickets, newest purchase first
    pub tickets: Vec<TicketView>,
    /// Sum of their prices
    pub total_amount: Money,
    /// `total_amount` as Rupiah text
    pub total_amount_formatted: String,
    /// Sum of their admissions
    pub total_tickets: u32,
    /// Text for the share sheet
    pub share_text: String,
    /// Payload of the download button
    pub download: Vec<TicketDownload>,
}

impl ConfirmationView {
    /// Builds the confirmation page from the latest active tickets
    #[must_use]
    pub fn build(state: &StorefrontState) -> Self {
        let mut recent: Vec<&Ticket> = state.tickets.iter().filter(|t| t.is_active()).collect();
        // Stable: same-day tickets keep purchase order
        recent.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        recent.truncate(CONFIRMATION_TICKET_LIMIT);

        let total_amount: Money = recent.iter().map(|t| t.total_price).sum();
        let total_tickets = recent.iter().fold(0_u32, |acc, t| acc.saturating_add(t.quantity));

        Self {
            share_text: format!(
                "I just booked {total_tickets} tickets for {} events!",
                recent.len()
            ),
            download: recent
                .iter()
                .map(|t| TicketDownload {
                    id: t.id.clone(),
                    event: t.event_title.clone(),
                    ticket_type: t.ticket_type.clone(),
                    quantity: t.quantity,
                    qr_code: t.qr_code.clone(),
                    date: t.event_date.to_string(),
                })
                .collect(),
            tickets: recent.into_iter().map(TicketView::from).collect(),
            total_amount_formatted: format_currency(total_amount),
            total_amount,
            total_tickets,
        }
    }
}
