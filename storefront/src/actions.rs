//! Actions accepted by the storefront reducer.
//!
//! On the wire an action is `{"type": "ADD_TO_CART", "payload": {...}}`.
//! Types the reducer does not know deserialize to
//! [`StorefrontAction::Unknown`] and change nothing.

use crate::error::StorefrontError;
use crate::payment_gateway::PaymentReceipt;
use crate::types::{
    CartItem, CartKey, CartQuantity, CheckoutAttempt, PaymentDetails, Ticket, TicketId, User,
};
use serde::{Deserialize, Serialize};

/// Storefront actions (commands and results).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorefrontAction {
    // ========== Session ==========
    /// Start a session (no credential check)
    Login(User),
    /// End the session and empty the cart
    Logout,

    // ========== Cart ==========
    /// Add a line, or overwrite the quantity of an existing one
    AddToCart(CartItem),
    /// Remove a line
    RemoveFromCart(CartKey),
    /// Set the quantity of an existing line. Zero keeps the line.
    UpdateCartQuantity(CartQuantity),
    /// Empty the cart
    ClearCart,

    // ========== Tickets ==========
    /// Append tickets and empty the cart
    PurchaseTickets(Vec<Ticket>),
    /// Cancel an active ticket
    CancelTicket(TicketId),

    // ========== Checkout ==========
    /// Start paying for the cart
    Checkout {
        /// Attempt id chosen by the caller, echoed by every outcome
        #[serde(default)]
        attempt: CheckoutAttempt,
        /// Payment method and its fields
        payment: PaymentDetails,
    },
    /// Gateway approved the charge
    PaymentSucceeded {
        /// Attempt the payment belongs to
        attempt: CheckoutAttempt,
        /// Gateway receipt
        receipt: PaymentReceipt,
    },
    /// Gateway declined or timed out
    PaymentFailed {
        /// Attempt the payment belongs to
        attempt: CheckoutAttempt,
        /// Gateway message, for logs
        reason: String,
    },
    /// Abort the running payment
    AbortCheckout,
    /// Checkout refused before any payment started
    CheckoutRejected {
        /// Attempt that was refused
        attempt: CheckoutAttempt,
        /// Why
        error: StorefrontError,
    },
    /// Running payment was aborted
    CheckoutAborted {
        /// Attempt that was aborted, if one was running
        attempt: Option<CheckoutAttempt>,
    },

    /// Any type the reducer does not handle
    #[serde(other)]
    Unknown,
}

impl StorefrontAction {
    /// Wire names of every handled action type
    pub const TYPES: [&'static str; 14] = [
        "LOGIN",
        "LOGOUT",
        "ADD_TO_CART",
        "REMOVE_FROM_CART",
        "UPDATE_CART_QUANTITY",
        "CLEAR_CART",
        "PURCHASE_TICKETS",
        "CANCEL_TICKET",
        "CHECKOUT",
        "PAYMENT_SUCCEEDED",
        "PAYMENT_FAILED",
        "ABORT_CHECKOUT",
        "CHECKOUT_REJECTED",
        "CHECKOUT_ABORTED",
    ];

    /// Decodes a raw action, mapping unknown or missing types to `Unknown`.
    ///
    /// # Errors
    ///
    /// Returns the decoding error when a known type carries a bad payload.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let known = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|t| Self::TYPES.contains(&t));

        if known {
            serde_json::from_value(value)
        } else {
            Ok(Self::Unknown)
        }
    }

    /// Whether this action edits the cart lines
    #[must_use]
    pub const fn edits_cart(&self) -> bool {
        matches!(
            self,
            Self::AddToCart(_)
                | Self::RemoveFromCart(_)
                | Self::UpdateCartQuantity(_)
                | Self::ClearCart
        )
    }

    /// Whether this action ends a checkout attempt
    #[must_use]
    pub fn ends_checkout(&self, attempt: CheckoutAttempt) -> bool {
        match self {
            Self::PaymentSucceeded { attempt: a, .. }
            | Self::PaymentFailed { attempt: a, .. }
            | Self::CheckoutRejected { attempt: a, .. } => *a == attempt,
            Self::CheckoutAborted { attempt: a } => *a == Some(attempt),
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Money;
    use serde_json::json;

    #[test]
    fn test_tagged_wire_format() {
        let action = StorefrontAction::from_json(json!({
            "type": "ADD_TO_CART",
            "payload": {
                "eventId": "evt-jazz-gunung",
                "ticketTypeId": "vip",
                "quantity": 2,
                "price": 750000
            }
        }))
        .unwrap();

        assert_eq!(
            action,
            StorefrontAction::AddToCart(CartItem {
                event_id: "evt-jazz-gunung".into(),
                ticket_type_id: "vip".into(),
                quantity: 2,
                price: Money::from_rupiah(750_000),
            })
        );
    }

    #[test]
    fn test_unit_and_newtype_payloads() {
        assert_eq!(
            StorefrontAction::from_json(json!({"type": "LOGOUT"})).unwrap(),
            StorefrontAction::Logout
        );
        assert_eq!(
            StorefrontAction::from_json(json!({"type": "CANCEL_TICKET", "payload": "T-1"}))
                .unwrap(),
            StorefrontAction::CancelTicket(TicketId::new("T-1"))
        );
    }

    #[test]
    fn test_unknown_types_decode_to_unknown() {
        assert_eq!(
            StorefrontAction::from_json(json!({"type": "SET_THEME", "payload": {"dark": true}}))
                .unwrap(),
            StorefrontAction::Unknown
        );
        assert_eq!(
            StorefrontAction::from_json(json!({"payload": 1})).unwrap(),
            StorefrontAction::Unknown
        );
        // Direct serde decoding falls back too
        let direct: StorefrontAction = serde_json::from_str(r#"{"type":"SET_THEME"}"#).unwrap();
        assert_eq!(direct, StorefrontAction::Unknown);
    }

    #[test]
    fn test_known_type_with_bad_payload_is_an_error() {
        assert!(
            StorefrontAction::from_json(json!({"type": "ADD_TO_CART", "payload": {"eventId": 3}}))
                .is_err()
        );
    }

    #[test]
    fn test_every_listed_type_round_trips_its_tag() {
        let attempt = CheckoutAttempt::new();
        let aborted = serde_json::to_value(StorefrontAction::CheckoutAborted {
            attempt: Some(attempt),
        })
        .unwrap();
        assert_eq!(aborted["type"], "CHECKOUT_ABORTED");
        assert!(StorefrontAction::TYPES.contains(&"CHECKOUT_ABORTED"));
        assert_eq!(
            serde_json::to_value(StorefrontAction::ClearCart).unwrap()["type"],
            "CLEAR_CART"
        );
    }

    #[test]
    fn test_ends_checkout_matches_attempt() {
        let mine = CheckoutAttempt::new();
        let other = CheckoutAttempt::new();

        let rejected = StorefrontAction::CheckoutRejected {
            attempt: other,
            error: StorefrontError::CheckoutInProgress,
        };
        assert!(!rejected.ends_checkout(mine));
        assert!(rejected.ends_checkout(other));
        assert!(
            StorefrontAction::CheckoutAborted { attempt: Some(mine) }.ends_checkout(mine)
        );
        assert!(!StorefrontAction::ClearCart.ends_checkout(mine));
    }

    #[test]
    fn test_edits_cart_covers_cart_actions_only() {
        assert!(StorefrontAction::ClearCart.edits_cart());
        assert!(StorefrontAction::RemoveFromCart(CartKey::new("evt", "vip")).edits_cart());
        assert!(!StorefrontAction::Logout.edits_cart());
        assert!(!StorefrontAction::AbortCheckout.edits_cart());
    }
}
