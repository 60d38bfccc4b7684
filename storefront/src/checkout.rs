//! Checkout rules: order totals, validation and ticket issuance.
//!
//! The reducer drives the flow; this module holds the pieces that do not
//! touch the store so they can be reused by read views and tested alone.

use crate::catalog::Catalog;
use crate::error::StorefrontError;
use crate::state::StorefrontState;
use crate::types::{CartItem, Money, PaymentDetails, Ticket, TicketId, TicketStatus};
use chrono::NaiveDate;
use loket_core::environment::IdGenerator;
use serde::{Deserialize, Serialize};

/// Default service fee: 5% of the subtotal
pub const DEFAULT_SERVICE_FEE_BPS: u32 = 500;

/// Totals shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Sum of line totals
    pub subtotal: Money,
    /// Service fee on the subtotal
    pub service_fee: Money,
    /// Amount charged
    pub total: Money,
    /// Number of tickets across all lines
    pub item_count: u32,
}

impl OrderSummary {
    /// Computes totals for `lines` with a fee of `fee_bps` basis points
    #[must_use]
    pub fn from_lines(lines: &[CartItem], fee_bps: u32) -> Self {
        let subtotal: Money = lines.iter().map(CartItem::line_total).sum();
        let service_fee = subtotal.basis_points(fee_bps);
        Self {
            subtotal,
            service_fee,
            total: subtotal + service_fee,
            item_count: lines.iter().map(|l| l.quantity).fold(0, u32::saturating_add),
        }
    }
}

/// Checks a checkout request against the current state.
///
/// Returns the lines that will be purchased (lines with quantity 0 are
/// dropped). Checks run in this order: in-flight checkout, session, empty
/// cart, card fields, availability.
///
/// # Errors
///
/// Returns the first rule the request breaks.
pub fn validate(
    state: &StorefrontState,
    payment: &PaymentDetails,
) -> Result<Vec<CartItem>, StorefrontError> {
    if state.checkout.is_in_flight() {
        return Err(StorefrontError::CheckoutInProgress);
    }
    if !state.is_authenticated {
        return Err(StorefrontError::LoginRequired);
    }

    let lines: Vec<CartItem> = state
        .cart
        .iter()
        .filter(|line| line.quantity > 0)
        .cloned()
        .collect();
    if lines.is_empty() {
        return Err(StorefrontError::EmptyCart);
    }

    validate_payment(payment)?;
    validate_availability(&state.catalog, &lines)?;

    Ok(lines)
}

/// Card payments need every card field; other methods need nothing.
///
/// # Errors
///
/// Returns `IncompleteCardDetails` when a card field is blank.
pub fn validate_payment(payment: &PaymentDetails) -> Result<(), StorefrontError> {
    match payment {
        PaymentDetails::CreditCard(card) if !card.is_complete() => {
            Err(StorefrontError::IncompleteCardDetails)
        },
        _ => Ok(()),
    }
}

/// Every line must exist in the catalog and fit in what is left.
///
/// # Errors
///
/// Returns `EventNotFound`, `TicketTypeNotFound` or `InsufficientAvailability`.
pub fn validate_availability(catalog: &Catalog, lines: &[CartItem]) -> Result<(), StorefrontError> {
    for line in lines {
        let (_, tier) = catalog.resolve(&line.key())?;
        if line.quantity > tier.available {
            return Err(StorefrontError::InsufficientAvailability {
                event_id: line.event_id.clone(),
                ticket_type_id: line.ticket_type_id.clone(),
                requested: line.quantity,
                available: tier.available,
            });
        }
    }
    Ok(())
}

/// Issues one active ticket per line, dated `purchase_date`.
///
/// # Errors
///
/// Returns `EventNotFound` or `TicketTypeNotFound` for a line the catalog
/// does not know.
pub fn build_tickets(
    catalog: &Catalog,
    lines: &[CartItem],
    purchase_date: NaiveDate,
    ids: &dyn IdGenerator,
) -> Result<Vec<Ticket>, StorefrontError> {
    lines
        .iter()
        .map(|line| {
            let (event, tier) = catalog.resolve(&line.key())?;
            Ok(Ticket {
                id: TicketId::new(format!("T-{}", ids.next_id().simple())),
                event_id: event.id.clone(),
                event_title: event.title.clone(),
                ticket_type: tier.name.clone(),
                quantity: line.quantity,
                total_price: line.line_total(),
                purchase_date,
                event_date: event.date,
                status: TicketStatus::Active,
                qr_code: format!("QR-{}", ids.next_id().simple()),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{CardDetails, CartKey, EWalletProvider, User, UserId};
    use loket_testing::SequentialIdGenerator;

    fn line(event: &str, tier: &str, quantity: u32, price: u64) -> CartItem {
        CartItem {
            event_id: event.into(),
            ticket_type_id: tier.into(),
            quantity,
            price: Money::from_rupiah(price),
        }
    }

    fn logged_in(cart: Vec<CartItem>) -> StorefrontState {
        let mut state = StorefrontState::seeded();
        state.user = Some(User {
            id: UserId::new("u-1"),
            email: "sari@example.com".to_string(),
            name: "sari".to_string(),
        });
        state.is_authenticated = true;
        state.cart = cart;
        state
    }

    fn card() -> PaymentDetails {
        PaymentDetails::CreditCard(CardDetails {
            card_number: "4111 1111 1111 1111".to_string(),
            expiry_date: "12/27".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "Sari Dewi".to_string(),
        })
    }

    #[test]
    fn test_summary_with_five_percent_fee() {
        let summary = OrderSummary::from_lines(&[line("evt-a", "vip", 2, 500_000)], 500);

        assert_eq!(summary.subtotal, Money::from_rupiah(1_000_000));
        assert_eq!(summary.service_fee, Money::from_rupiah(50_000));
        assert_eq!(summary.total, Money::from_rupiah(1_050_000));
        assert_eq!(summary.total.to_string(), "Rp 1.050.000");
        assert_eq!(summary.item_count, 2);
    }

    #[test]
    fn test_validate_order_of_checks() {
        let mut state = logged_in(vec![]);
        assert_eq!(validate(&state, &card()), Err(StorefrontError::EmptyCart));

        state.is_authenticated = false;
        assert_eq!(validate(&state, &card()), Err(StorefrontError::LoginRequired));
    }

    #[test]
    fn test_zero_quantity_lines_are_not_purchased() {
        let state = logged_in(vec![
            line("evt-pameran-batik", "vip", 0, 200_000),
            line("evt-pameran-batik", "regular", 1, 75_000),
        ]);

        let lines = validate(&state, &PaymentDetails::BankTransfer).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].key(), CartKey::new("evt-pameran-batik", "regular"));

        let only_zero = logged_in(vec![line("evt-pameran-batik", "vip", 0, 200_000)]);
        assert_eq!(
            validate(&only_zero, &PaymentDetails::BankTransfer),
            Err(StorefrontError::EmptyCart)
        );
    }

    #[test]
    fn test_incomplete_card_rejected_but_wallet_needs_nothing() {
        let state = logged_in(vec![line("evt-pameran-batik", "regular", 1, 75_000)]);
        let blank = PaymentDetails::CreditCard(CardDetails::default());

        assert_eq!(validate(&state, &blank), Err(StorefrontError::IncompleteCardDetails));
        assert!(validate(&state, &card()).is_ok());
        assert!(
            validate(&state, &PaymentDetails::EWallet { provider: EWalletProvider::Dana }).is_ok()
        );
    }

    #[test]
    fn test_oversell_rejected() {
        // Curator Tour has 3 left in the seed
        let state = logged_in(vec![line("evt-pameran-batik", "vip", 5, 200_000)]);

        assert_eq!(
            validate(&state, &PaymentDetails::BankTransfer),
            Err(StorefrontError::InsufficientAvailability {
                event_id: "evt-pameran-batik".into(),
                ticket_type_id: "vip".into(),
                requested: 5,
                available: 3,
            })
        );
    }

    #[test]
    fn test_build_tickets_denormalizes_event() {
        let catalog = Catalog::seed();
        let ids = SequentialIdGenerator::new();
        let purchase_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let tickets = build_tickets(
            &catalog,
            &[
                line("evt-jazz-gunung", "vip", 2, 750_000),
                line("evt-seminar-startup", "regular", 1, 150_000),
            ],
            purchase_date,
            &ids,
        )
        .unwrap();

        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].event_title, "Jazz Gunung Bromo");
        assert_eq!(tickets[0].ticket_type, "VIP");
        assert_eq!(tickets[0].total_price, Money::from_rupiah(1_500_000));
        assert_eq!(tickets[0].status, TicketStatus::Active);
        assert_eq!(tickets[0].purchase_date, purchase_date);
        assert_ne!(tickets[0].id, tickets[1].id);
        assert_ne!(tickets[0].qr_code, tickets[1].qr_code);
        assert_eq!(ids.issued(), 4);
    }
}
