//! Storefront state owned by the store.

use crate::catalog::{seed_tickets, Catalog};
use crate::checkout::OrderSummary;
use crate::error::StorefrontError;
use crate::payment_gateway::PaymentReceipt;
use crate::types::{
    CartItem, CartKey, CheckoutAttempt, PaymentMethod, Ticket, TicketId, User,
};
use serde::{Deserialize, Serialize};

/// Everything the storefront knows, for one shopper session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontState {
    /// Logged-in user
    pub user: Option<User>,
    /// Whether a session is active
    pub is_authenticated: bool,
    /// Events and remaining inventory
    pub catalog: Catalog,
    /// Cart lines in insertion order
    pub cart: Vec<CartItem>,
    /// Issued tickets in purchase order
    pub tickets: Vec<Ticket>,
    /// Checkout progress
    pub checkout: CheckoutStatus,
    /// Why the last checkout was rejected or failed
    pub last_error: Option<StorefrontError>,
    /// Outcome of the last successful checkout
    pub last_confirmation: Option<Confirmation>,
}

impl StorefrontState {
    /// State over the seeded catalog and demo tickets, logged out, empty cart
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            catalog: Catalog::seed(),
            tickets: seed_tickets(),
            ..Self::default()
        }
    }

    /// Cart line for a key
    #[must_use]
    pub fn cart_line(&self, key: &CartKey) -> Option<&CartItem> {
        self.cart.iter().find(|item| item.matches(key))
    }

    /// Ticket by id
    #[must_use]
    pub fn ticket(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == id)
    }
}

/// Progress of checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// No payment running
    #[default]
    Idle,
    /// A payment effect is running
    InFlight {
        /// Attempt the payment belongs to
        attempt: CheckoutAttempt,
        /// Method being charged
        method: PaymentMethod,
        /// Lines captured when checkout started
        lines: Vec<CartItem>,
        /// Totals being charged
        summary: OrderSummary,
    },
}

impl CheckoutStatus {
    /// Whether a payment is running
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    /// Attempt of the running payment
    #[must_use]
    pub const fn attempt(&self) -> Option<CheckoutAttempt> {
        match self {
            Self::Idle => None,
            Self::InFlight { attempt, .. } => Some(*attempt),
        }
    }
}

/// Record of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Attempt that succeeded
    pub attempt: CheckoutAttempt,
    /// Tickets issued by it
    pub ticket_ids: Vec<TicketId>,
    /// Totals charged
    pub summary: OrderSummary,
    /// Gateway receipt
    pub receipt: PaymentReceipt,
}
