//! Per-event ticket selection and the actions a booking turns into.
//!
//! A [`TicketSelection`] belongs to one event. Quantities are clamped to
//! what the tier has left. Turning a selection into a booking never touches
//! the store directly; it yields the actions to dispatch and the page to
//! show next.

use crate::actions::StorefrontAction;
use crate::error::StorefrontError;
use crate::routes::Route;
use crate::types::{CartItem, Event, EventId, Money, TicketTypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quantities picked per tier of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSelection {
    event_id: EventId,
    quantities: BTreeMap<TicketTypeId, u32>,
}

impl TicketSelection {
    /// Empty selection for `event`
    #[must_use]
    pub fn new(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            quantities: BTreeMap::new(),
        }
    }

    /// Event the selection belongs to
    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Selected quantity of a tier
    #[must_use]
    pub fn quantity(&self, tier: &TicketTypeId) -> u32 {
        self.quantities.get(tier).copied().unwrap_or(0)
    }

    /// Sets a tier's quantity, clamped to `[0, available]`.
    ///
    /// Returns the quantity actually kept.
    ///
    /// # Errors
    ///
    /// Returns `TicketTypeNotFound` when the event has no such tier.
    pub fn set(
        &mut self,
        event: &Event,
        tier_id: &TicketTypeId,
        quantity: u32,
    ) -> Result<u32, StorefrontError> {
        let tier = event
            .ticket_type(tier_id)
            .ok_or_else(|| StorefrontError::TicketTypeNotFound {
                event_id: event.id.clone(),
                ticket_type_id: tier_id.clone(),
            })?;

        let clamped = quantity.min(tier.available);
        if clamped == 0 {
            self.quantities.remove(tier_id);
        } else {
            self.quantities.insert(tier_id.clone(), clamped);
        }
        Ok(clamped)
    }

    /// Adds one ticket of a tier, up to what is left
    ///
    /// # Errors
    ///
    /// Returns `TicketTypeNotFound` when the event has no such tier.
    pub fn increment(&mut self, event: &Event, tier_id: &TicketTypeId) -> Result<u32, StorefrontError> {
        let next = self.quantity(tier_id).saturating_add(1);
        self.set(event, tier_id, next)
    }

    /// Removes one ticket of a tier, stopping at zero
    ///
    /// # Errors
    ///
    /// Returns `TicketTypeNotFound` when the event has no such tier.
    pub fn decrement(&mut self, event: &Event, tier_id: &TicketTypeId) -> Result<u32, StorefrontError> {
        let next = self.quantity(tier_id).saturating_sub(1);
        self.set(event, tier_id, next)
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Number of tickets selected across tiers
    #[must_use]
    pub fn ticket_count(&self) -> u32 {
        self.quantities.values().fold(0, |acc, q| acc.saturating_add(*q))
    }

    /// Price of the selection at current tier prices
    #[must_use]
    pub fn total(&self, event: &Event) -> Money {
        self.quantities
            .iter()
            .filter_map(|(id, q)| event.ticket_type(id).map(|t| t.price.times(*q)))
            .sum()
    }

    /// Cart lines for the selection, in the event's tier order
    #[must_use]
    pub fn cart_items(&self, event: &Event) -> Vec<CartItem> {
        event
            .ticket_types
            .iter()
            .filter_map(|tier| {
                let quantity = self.quantity(&tier.id);
                (quantity > 0).then(|| CartItem {
                    event_id: event.id.clone(),
                    ticket_type_id: tier.id.clone(),
                    quantity,
                    price: tier.price,
                })
            })
            .collect()
    }
}

/// What the shopper pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingMode {
    /// Keep shopping: add to cart, go to the cart
    AddToCart,
    /// Buy only this selection: replace the cart, go to checkout
    BookNow,
}

/// Actions to dispatch for a booking, in order, and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPlan {
    /// Actions to dispatch in order
    pub actions: Vec<StorefrontAction>,
    /// Page to show afterwards
    pub next: Route,
}

/// Turns a selection into a booking plan.
///
/// # Errors
///
/// - `LoginRequired` without a session (the caller should go to `/login`)
/// - `NoTicketsSelected` for an empty selection
pub fn plan_booking(
    event: &Event,
    selection: &TicketSelection,
    mode: BookingMode,
    authenticated: bool,
) -> Result<BookingPlan, StorefrontError> {
    if !authenticated {
        return Err(StorefrontError::LoginRequired);
    }
    if selection.is_empty() {
        return Err(StorefrontError::NoTicketsSelected);
    }

    let adds = selection
        .cart_items(event)
        .into_iter()
        .map(StorefrontAction::AddToCart);

    let plan = match mode {
        BookingMode::AddToCart => BookingPlan {
            actions: adds.collect(),
            next: Route::Cart,
        },
        BookingMode::BookNow => BookingPlan {
            actions: std::iter::once(StorefrontAction::ClearCart).chain(adds).collect(),
            next: Route::Checkout,
        },
    };

    Ok(plan)
}
