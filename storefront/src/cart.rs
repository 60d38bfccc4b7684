//! Cart page helpers: quantity edits and the priced cart view.

use crate::actions::StorefrontAction;
use crate::checkout::OrderSummary;
use crate::format::{format_currency, format_date};
use crate::state::StorefrontState;
use crate::types::{CartKey, CartQuantity, EventId, Money, TicketTypeId};
use serde::Serialize;

/// Action for a quantity edit on the cart page.
///
/// Zero removes the line; the reducer itself keeps zero-quantity lines.
#[must_use]
pub fn change_quantity(key: CartKey, quantity: u32) -> StorefrontAction {
    if quantity == 0 {
        StorefrontAction::RemoveFromCart(key)
    } else {
        StorefrontAction::UpdateCartQuantity(CartQuantity {
            event_id: key.event_id,
            ticket_type_id: key.ticket_type_id,
            quantity,
        })
    }
}

/// One priced cart line joined with its event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// Event of the line
    pub event_id: EventId,
    /// Tier of the line
    pub ticket_type_id: TicketTypeId,
    /// Event title
    pub event_title: String,
    /// Tier name
    pub ticket_type_name: String,
    /// Long event date
    pub event_date: String,
    /// Venue
    pub location: String,
    /// Number of tickets
    pub quantity: u32,
    /// Unit price captured at add time
    pub unit_price: Money,
    /// Unit price times quantity
    pub line_total: Money,
    /// `line_total` as Rupiah text
    pub line_total_formatted: String,
}

/// The cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Lines whose event is in the catalog, in cart order
    pub lines: Vec<CartLineView>,
    /// Totals over every line
    pub summary: OrderSummary,
    /// Subtotal as Rupiah text
    pub subtotal_formatted: String,
    /// Service fee as Rupiah text
    pub service_fee_formatted: String,
    /// Total as Rupiah text
    pub total_formatted: String,
}

impl CartView {
    /// Builds the cart page from the state
    #[must_use]
    pub fn build(state: &StorefrontState, fee_bps: u32) -> Self {
        let lines = state
            .cart
            .iter()
            .filter_map(|item| {
                let (event, tier) = state.catalog.resolve(&item.key()).ok()?;
                Some(CartLineView {
                    event_id: item.event_id.clone(),
                    ticket_type_id: item.ticket_type_id.clone(),
                    event_title: event.title.clone(),
                    ticket_type_name: tier.name.clone(),
                    event_date: format_date(event.date),
                    location: event.location.clone(),
                    quantity: item.quantity,
                    unit_price: item.price,
                    line_total: item.line_total(),
                    line_total_formatted: format_currency(item.line_total()),
                })
            })
            .collect();

        let summary = OrderSummary::from_lines(&state.cart, fee_bps);

        Self {
            lines,
            subtotal_formatted: format_currency(summary.subtotal),
            service_fee_formatted: format_currency(summary.service_fee),
            total_formatted: format_currency(summary.total),
            summary,
        }
    }

    /// Whether the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
