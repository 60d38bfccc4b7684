//! Property tests for the cart transitions of the reducer.

#![allow(clippy::unwrap_used)]

use loket_core::reducer::Reducer;
use loket_storefront::payment_gateway::SimulatedGateway;
use loket_storefront::types::{CartItem, CartKey, Money};
use loket_storefront::{StorefrontAction, StorefrontEnvironment, StorefrontReducer, StorefrontState};
use loket_testing::{test_clock, SequentialIdGenerator};
use proptest::prelude::*;
use std::sync::Arc;

const EVENTS: [&str; 3] = ["evt-jazz-gunung", "evt-pesta-rakyat", "evt-pameran-batik"];
const TIERS: [&str; 3] = ["regular", "vip", "vvip"];

fn env() -> StorefrontEnvironment {
    StorefrontEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new()),
        Arc::new(SimulatedGateway::instant()),
    )
}

fn item(event: usize, tier: usize, quantity: u32) -> CartItem {
    CartItem {
        event_id: EVENTS[event].into(),
        ticket_type_id: TIERS[tier].into(),
        quantity,
        price: Money::from_rupiah(100_000),
    }
}

fn arb_item() -> impl Strategy<Value = CartItem> {
    (0..EVENTS.len(), 0..TIERS.len(), 1_u32..10).prop_map(|(e, t, q)| item(e, t, q))
}

fn apply(state: &mut StorefrontState, actions: impl IntoIterator<Item = StorefrontAction>) {
    let reducer = StorefrontReducer::new();
    let env = env();
    for action in actions {
        let effects = reducer.reduce(state, action, &env);
        assert!(effects.is_empty(), "cart actions have no effects");
    }
}

proptest! {
    /// Adding the same key repeatedly keeps one line with the last quantity
    #[test]
    fn repeated_add_overwrites(quantities in prop::collection::vec(1_u32..50, 1..10)) {
        let mut state = StorefrontState::default();
        apply(&mut state, quantities.iter().map(|q| StorefrontAction::AddToCart(item(0, 1, *q))));

        prop_assert_eq!(state.cart.len(), 1);
        prop_assert_eq!(state.cart[0].quantity, *quantities.last().unwrap());
    }

    /// Every distinct key ends up as exactly one line
    #[test]
    fn one_line_per_key(items in prop::collection::vec(arb_item(), 0..20)) {
        let mut state = StorefrontState::default();
        apply(&mut state, items.iter().cloned().map(StorefrontAction::AddToCart));

        let mut keys: Vec<CartKey> = items.iter().map(CartItem::key).collect();
        keys.sort_by(|a, b| (&a.event_id, &a.ticket_type_id).cmp(&(&b.event_id, &b.ticket_type_id)));
        keys.dedup();
        prop_assert_eq!(state.cart.len(), keys.len());

        for key in keys {
            let last = items.iter().rev().find(|i| i.key() == key).unwrap();
            prop_assert_eq!(state.cart_line(&key).map(|l| l.quantity), Some(last.quantity));
        }
    }

    /// CLEAR_CART empties any cart and leaves tickets alone
    #[test]
    fn clear_cart_empties(items in prop::collection::vec(arb_item(), 0..20)) {
        let mut state = StorefrontState::seeded();
        let tickets_before = state.tickets.clone();
        apply(&mut state, items.into_iter().map(StorefrontAction::AddToCart));
        apply(&mut state, [StorefrontAction::ClearCart]);

        prop_assert!(state.cart.is_empty());
        prop_assert_eq!(state.tickets, tickets_before);
    }

    /// Remove then add yields a fresh single line with the new quantity
    #[test]
    fn remove_then_add_is_fresh(first in 1_u32..20, second in 1_u32..20) {
        let mut state = StorefrontState::default();
        let key = item(2, 0, first).key();
        apply(&mut state, [
            StorefrontAction::AddToCart(item(2, 0, first)),
            StorefrontAction::RemoveFromCart(key.clone()),
            StorefrontAction::AddToCart(item(2, 0, second)),
        ]);

        prop_assert_eq!(state.cart.len(), 1);
        prop_assert_eq!(state.cart_line(&key).map(|l| l.quantity), Some(second));
    }
}
