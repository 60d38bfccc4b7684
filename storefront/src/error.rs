//! Domain errors and their HTTP mapping.

use crate::routes::Route;
use crate::types::{EventId, TicketId, TicketTypeId};
use loket_web::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by storefront operations.
///
/// The reducer never fails; rejected commands record one of these in
/// `StorefrontState::last_error` and announce it through a
/// `CHECKOUT_REJECTED` action. Handlers map them to HTTP responses.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorefrontError {
    /// Registration confirm-password differs from the password
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// A registration or login field is blank
    #[error("{field} is required")]
    MissingField {
        /// Name of the blank field
        field: String,
    },

    /// Card payment without every card field filled in
    #[error("Please fill in all card details")]
    IncompleteCardDetails,

    /// Checkout with nothing in the cart
    #[error("Your cart is empty")]
    EmptyCart,

    /// Booking without any tier selected
    #[error("Please select at least one ticket")]
    NoTicketsSelected,

    /// A cart line asks for more tickets than are left
    #[error("Only {available} tickets left for {ticket_type_id}, requested {requested}")]
    InsufficientAvailability {
        /// Event of the line
        event_id: EventId,
        /// Tier of the line
        ticket_type_id: TicketTypeId,
        /// Quantity in the cart
        requested: u32,
        /// Quantity still for sale
        available: u32,
    },

    /// Unknown event id
    #[error("Event {event_id} not found")]
    EventNotFound {
        /// The id that was looked up
        event_id: EventId,
    },

    /// Unknown tier for an existing event
    #[error("Ticket type {ticket_type_id} not found for event {event_id}")]
    TicketTypeNotFound {
        /// Event that was searched
        event_id: EventId,
        /// The tier id that was looked up
        ticket_type_id: TicketTypeId,
    },

    /// Unknown ticket id
    #[error("Ticket {ticket_id} not found")]
    TicketNotFound {
        /// The id that was looked up
        ticket_id: TicketId,
    },

    /// Booking or checkout without a session
    #[error("Please log in to continue")]
    LoginRequired,

    /// A second checkout while one is being paid
    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    /// Payment was declined or errored
    #[error("There was an error processing your payment. Please try again.")]
    PaymentFailed,
}

impl From<StorefrontError> for AppError {
    fn from(err: StorefrontError) -> Self {
        let message = err.to_string();
        match err {
            StorefrontError::PasswordMismatch
            | StorefrontError::MissingField { .. }
            | StorefrontError::IncompleteCardDetails
            | StorefrontError::NoTicketsSelected
            | StorefrontError::InsufficientAvailability { .. } => Self::validation(message),
            StorefrontError::EventNotFound { event_id } => Self::not_found("Event", event_id),
            StorefrontError::TicketTypeNotFound { ticket_type_id, .. } => {
                Self::not_found("Ticket type", ticket_type_id)
            },
            StorefrontError::TicketNotFound { ticket_id } => Self::not_found("Ticket", ticket_id),
            StorefrontError::LoginRequired => Self::login_required(Route::Login.path()),
            StorefrontError::EmptyCart => Self::conflict(message).with_location(Route::Cart.path()),
            StorefrontError::CheckoutInProgress => Self::conflict(message),
            StorefrontError::PaymentFailed => Self::payment_failed(message),
        }
    }
}
