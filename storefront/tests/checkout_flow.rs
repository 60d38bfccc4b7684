//! Checkout through a running store: payment effects, inventory and aborts.

#![allow(clippy::unwrap_used, clippy::panic)]

use loket_storefront::error::StorefrontError;
use loket_storefront::payment_gateway::{
    DecliningGateway, PaymentGateway, PaymentLatency, SimulatedGateway,
};
use loket_storefront::state::CheckoutStatus;
use loket_storefront::types::{
    CartItem, CartKey, CheckoutAttempt, EWalletProvider, Money, PaymentDetails, User, UserId,
};
use loket_storefront::{
    StorefrontAction, StorefrontEnvironment, StorefrontReducer, StorefrontState, StorefrontStore,
};
use loket_testing::{test_clock, SequentialIdGenerator};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn store(gateway: Arc<dyn PaymentGateway>) -> StorefrontStore {
    let environment = StorefrontEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new()),
        gateway,
    )
    .with_payment_timeout(Duration::from_secs(60));
    StorefrontStore::new(StorefrontState::seeded(), StorefrontReducer::new(), environment)
}

fn slow_gateway() -> Arc<dyn PaymentGateway> {
    let slow = Duration::from_secs(30);
    SimulatedGateway::shared(PaymentLatency {
        credit_card: slow,
        bank_transfer: slow,
        e_wallet: slow,
    })
}

fn batik_vip(quantity: u32) -> CartItem {
    CartItem {
        event_id: "evt-pameran-batik".into(),
        ticket_type_id: "vip".into(),
        quantity,
        price: Money::from_rupiah(200_000),
    }
}

fn gopay() -> PaymentDetails {
    PaymentDetails::EWallet {
        provider: EWalletProvider::Gopay,
    }
}

async fn shop(store: &StorefrontStore, items: Vec<CartItem>) {
    store
        .send(StorefrontAction::Login(User {
            id: UserId::new("U-1"),
            email: "sari@example.com".to_string(),
            name: "sari".to_string(),
        }))
        .await
        .unwrap();
    for item in items {
        store.send(StorefrontAction::AddToCart(item)).await.unwrap();
    }
}

async fn checkout(store: &StorefrontStore, attempt: CheckoutAttempt) -> StorefrontAction {
    store
        .send_and_wait_for(
            StorefrontAction::Checkout {
                attempt,
                payment: gopay(),
            },
            move |action| action.ends_checkout(attempt),
            WAIT,
        )
        .await
        .unwrap()
}

async fn vip_available(store: &StorefrontStore) -> u32 {
    store
        .state(|s| {
            s.catalog
                .resolve(&CartKey::new("evt-pameran-batik", "vip"))
                .map(|(_, tier)| tier.available)
                .unwrap()
        })
        .await
}

#[tokio::test]
async fn successful_checkout_issues_tickets_and_decrements_inventory() {
    let store = store(Arc::new(SimulatedGateway::instant()));
    shop(&store, vec![batik_vip(2)]).await;
    let attempt = CheckoutAttempt::new();

    let outcome = checkout(&store, attempt).await;

    assert!(matches!(outcome, StorefrontAction::PaymentSucceeded { .. }));
    assert_eq!(vip_available(&store).await, 1);

    store
        .state(|s| {
            assert!(s.cart.is_empty());
            assert_eq!(s.checkout, CheckoutStatus::Idle);
            assert_eq!(s.tickets.len(), 3, "two seed tickets plus one per line");

            let ticket = s.tickets.last().unwrap();
            assert_eq!(ticket.quantity, 2);
            assert_eq!(ticket.total_price, Money::from_rupiah(400_000));
            assert_eq!(ticket.ticket_type, "Curator Tour");
            assert_eq!(ticket.purchase_date.to_string(), "2025-01-01");
            assert!(ticket.is_active());

            let confirmation = s.last_confirmation.as_ref().unwrap();
            assert_eq!(confirmation.attempt, attempt);
            assert_eq!(confirmation.summary.total, Money::from_rupiah(420_000));
            assert_eq!(confirmation.ticket_ids, vec![ticket.id.clone()]);
        })
        .await;
}

#[tokio::test]
async fn oversell_is_rejected_and_state_untouched() {
    let store = store(Arc::new(SimulatedGateway::instant()));
    shop(&store, vec![batik_vip(5)]).await;

    let outcome = checkout(&store, CheckoutAttempt::new()).await;

    let StorefrontAction::CheckoutRejected { error, .. } = outcome else {
        panic!("expected a rejection, got {outcome:?}");
    };
    assert_eq!(
        error,
        StorefrontError::InsufficientAvailability {
            event_id: "evt-pameran-batik".into(),
            ticket_type_id: "vip".into(),
            requested: 5,
            available: 3,
        }
    );
    assert_eq!(vip_available(&store).await, 3);
    assert_eq!(store.state(|s| s.cart.clone()).await, vec![batik_vip(5)]);
    assert_eq!(store.state(|s| s.tickets.len()).await, 2);
}

#[tokio::test]
async fn second_purchase_sees_reduced_inventory() {
    let store = store(Arc::new(SimulatedGateway::instant()));
    shop(&store, vec![batik_vip(2)]).await;
    assert!(matches!(
        checkout(&store, CheckoutAttempt::new()).await,
        StorefrontAction::PaymentSucceeded { .. }
    ));

    store.send(StorefrontAction::AddToCart(batik_vip(2))).await.unwrap();
    let outcome = checkout(&store, CheckoutAttempt::new()).await;

    assert!(matches!(
        outcome,
        StorefrontAction::CheckoutRejected {
            error: StorefrontError::InsufficientAvailability { available: 1, .. },
            ..
        }
    ));
    assert_eq!(vip_available(&store).await, 1);
}

#[tokio::test]
async fn declined_payment_keeps_cart() {
    let store = store(Arc::new(DecliningGateway::new("Insufficient funds")));
    shop(&store, vec![batik_vip(1)]).await;

    let outcome = checkout(&store, CheckoutAttempt::new()).await;

    assert!(matches!(outcome, StorefrontAction::PaymentFailed { .. }));
    store
        .state(|s| {
            assert_eq!(s.cart, vec![batik_vip(1)]);
            assert!(!s.checkout.is_in_flight());
            assert_eq!(s.last_error, Some(StorefrontError::PaymentFailed));
            assert_eq!(s.tickets.len(), 2);
        })
        .await;
    assert_eq!(vip_available(&store).await, 3);
}

#[tokio::test]
async fn abort_cancels_running_payment() {
    let store = store(slow_gateway());
    shop(&store, vec![batik_vip(1)]).await;
    let attempt = CheckoutAttempt::new();

    store
        .send(StorefrontAction::Checkout {
            attempt,
            payment: gopay(),
        })
        .await
        .unwrap();
    assert!(store.state(|s| s.checkout.is_in_flight()).await);

    let outcome = store
        .send_and_wait_for(
            StorefrontAction::AbortCheckout,
            |a| matches!(a, StorefrontAction::CheckoutAborted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StorefrontAction::CheckoutAborted {
            attempt: Some(attempt)
        }
    );
    store
        .state(|s| {
            assert_eq!(s.checkout, CheckoutStatus::Idle);
            assert_eq!(s.cart, vec![batik_vip(1)]);
            assert_eq!(s.tickets.len(), 2);
        })
        .await;
}

#[tokio::test]
async fn concurrent_checkout_is_rejected() {
    let store = store(slow_gateway());
    shop(&store, vec![batik_vip(1)]).await;

    store
        .send(StorefrontAction::Checkout {
            attempt: CheckoutAttempt::new(),
            payment: gopay(),
        })
        .await
        .unwrap();

    let outcome = checkout(&store, CheckoutAttempt::new()).await;

    assert!(matches!(
        outcome,
        StorefrontAction::CheckoutRejected {
            error: StorefrontError::CheckoutInProgress,
            ..
        }
    ));
    assert!(store.state(|s| s.checkout.is_in_flight()).await);

    store.shutdown(Duration::from_millis(100)).await.ok();
}

fn jazz_vip(quantity: u32) -> CartItem {
    CartItem {
        event_id: "evt-jazz-gunung".into(),
        ticket_type_id: "vip".into(),
        quantity,
        price: Money::from_rupiah(750_000),
    }
}

#[tokio::test]
async fn cart_edit_during_payment_is_refused_and_payment_completes() {
    let latency = Duration::from_millis(200);
    let store = store(SimulatedGateway::shared(PaymentLatency {
        credit_card: latency,
        bank_transfer: latency,
        e_wallet: latency,
    }));
    shop(&store, vec![batik_vip(1)]).await;
    let jazz_left = store
        .state(|s| s.catalog.resolve(&CartKey::new("evt-jazz-gunung", "vip")).unwrap().1.available)
        .await;

    let mut outcomes = store.subscribe_actions();
    let attempt = CheckoutAttempt::new();
    store
        .send(StorefrontAction::Checkout {
            attempt,
            payment: gopay(),
        })
        .await
        .unwrap();

    // Shopper keeps browsing while the gateway works
    store.send(StorefrontAction::AddToCart(jazz_vip(2))).await.unwrap();
    store
        .state(|s| {
            assert_eq!(s.cart, vec![batik_vip(1)]);
            assert_eq!(s.last_error, Some(StorefrontError::CheckoutInProgress));
            assert_eq!(s.checkout.attempt(), Some(attempt));
        })
        .await;

    let outcome = tokio::time::timeout(WAIT, async {
        loop {
            let action = outcomes.recv().await.unwrap();
            if action.ends_checkout(attempt) {
                break action;
            }
        }
    })
    .await
    .unwrap();

    assert!(matches!(outcome, StorefrontAction::PaymentSucceeded { .. }));
    store
        .state(move |s| {
            assert!(s.cart.is_empty());
            assert_eq!(s.tickets.len(), 3, "one ticket for the batik line only");
            assert_eq!(s.tickets.last().unwrap().event_id.as_str(), "evt-pameran-batik");
            let (_, jazz) = s.catalog.resolve(&CartKey::new("evt-jazz-gunung", "vip")).unwrap();
            assert_eq!(jazz.available, jazz_left);
        })
        .await;

    // Unlocked once the payment ended
    store.send(StorefrontAction::AddToCart(jazz_vip(2))).await.unwrap();
    assert_eq!(store.state(|s| s.cart.clone()).await, vec![jazz_vip(2)]);
}

#[tokio::test]
async fn logout_during_payment_aborts_it() {
    let store = store(slow_gateway());
    shop(&store, vec![batik_vip(1)]).await;
    let attempt = CheckoutAttempt::new();

    store
        .send(StorefrontAction::Checkout {
            attempt,
            payment: gopay(),
        })
        .await
        .unwrap();

    let outcome = store
        .send_and_wait_for(
            StorefrontAction::Logout,
            move |a| a.ends_checkout(attempt),
            WAIT,
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StorefrontAction::CheckoutAborted {
            attempt: Some(attempt)
        }
    );
    store
        .state(|s| {
            assert!(!s.is_authenticated);
            assert!(s.user.is_none());
            assert_eq!(s.checkout, CheckoutStatus::Idle);
            assert!(s.cart.is_empty());
            assert_eq!(s.tickets.len(), 2, "no tickets after the session ended");
            assert!(s.last_confirmation.is_none());
        })
        .await;
    assert_eq!(vip_available(&store).await, 3);
}
