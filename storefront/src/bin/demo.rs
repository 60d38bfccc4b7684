//! Storefront demo
//!
//! Scripted walk through the storefront without HTTP:
//! - Login
//! - Booking two tiers of one event into the cart
//! - Checkout with an e-wallet and the confirmation page
//! - Cancelling a ticket
//! - A declined card payment that leaves the cart intact
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use loket_core::environment::{SystemClock, UuidGenerator};
use loket_storefront::{
    auth::{self, LoginForm},
    booking::{plan_booking, BookingMode, TicketSelection},
    cart::CartView,
    payment_gateway::{DecliningGateway, PaymentGateway, SimulatedGateway},
    types::{CardDetails, CheckoutAttempt, EWalletProvider, EventId, PaymentDetails, TicketTypeId},
    views::ConfirmationView,
    StorefrontAction, StorefrontEnvironment, StorefrontReducer, StorefrontState, StorefrontStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WAIT: Duration = Duration::from_secs(5);

fn store_with(gateway: Arc<dyn PaymentGateway>) -> StorefrontStore {
    let environment =
        StorefrontEnvironment::new(Arc::new(SystemClock), Arc::new(UuidGenerator), gateway);
    StorefrontStore::new(StorefrontState::seeded(), StorefrontReducer::new(), environment)
}

async fn log_in(store: &StorefrontStore) -> anyhow::Result<()> {
    let form = LoginForm {
        email: "budi@example.com".to_string(),
        password: "demo".to_string(),
    };
    let user = auth::login(&form, store.environment().ids.as_ref())?;
    println!("✓ Logged in as {} ({})", user.name, user.email);
    store.send(StorefrontAction::Login(user)).await?;
    Ok(())
}

async fn book(
    store: &StorefrontStore,
    event_id: &str,
    picks: &[(&str, u32)],
    mode: BookingMode,
) -> anyhow::Result<()> {
    let event = store
        .state(|s| s.catalog.require_event(&EventId::new(event_id)).cloned())
        .await?;
    let mut selection = TicketSelection::new(&event);
    for (tier, quantity) in picks {
        selection.set(&event, &TicketTypeId::new(*tier), *quantity)?;
    }

    let plan = plan_booking(&event, &selection, mode, true)?;
    for action in plan.actions {
        store.send(action).await?;
    }
    println!(
        "✓ Booked {} tickets for {} ({}), next: {}",
        selection.ticket_count(),
        event.title,
        selection.total(&event),
        plan.next
    );
    Ok(())
}

async fn print_cart(store: &StorefrontStore) {
    let fee_bps = store.environment().service_fee_bps;
    let view = store.state(|s| CartView::build(s, fee_bps)).await;
    for line in &view.lines {
        println!(
            "   {} × {} / {}: {}",
            line.quantity, line.event_title, line.ticket_type_name, line.line_total_formatted
        );
    }
    println!("   Subtotal:    {}", view.subtotal_formatted);
    println!("   Service fee: {}", view.service_fee_formatted);
    println!("   Total:       {}", view.total_formatted);
}

async fn pay(store: &StorefrontStore, payment: PaymentDetails) -> anyhow::Result<StorefrontAction> {
    let attempt = CheckoutAttempt::new();
    let outcome = store
        .send_and_wait_for(
            StorefrontAction::Checkout { attempt, payment },
            move |action| action.ends_checkout(attempt),
            WAIT,
        )
        .await?;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,loket_storefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🎫 ============================================");
    println!("   Loket Storefront - Live Demo");
    println!("============================================\n");

    // ========== Happy path ==========

    let store = store_with(Arc::new(SimulatedGateway::instant()));
    log_in(&store).await?;

    println!("\n📋 Booking Pameran Batik Nusantara");
    book(
        &store,
        "evt-pameran-batik",
        &[("regular", 2), ("vip", 1)],
        BookingMode::AddToCart,
    )
    .await?;
    print_cart(&store).await;

    println!("\n💳 Paying with GoPay");
    match pay(
        &store,
        PaymentDetails::EWallet {
            provider: EWalletProvider::Gopay,
        },
    )
    .await?
    {
        StorefrontAction::PaymentSucceeded { receipt, .. } => {
            println!("✓ Payment approved: {}", receipt.transaction_id);
        },
        other => println!("✗ Checkout did not complete: {other:?}"),
    }

    let confirmation = store.state(ConfirmationView::build).await;
    println!("\n🎉 {}", confirmation.share_text);
    for ticket in &confirmation.tickets {
        println!(
            "   {} {} × {} ({}) QR {}",
            ticket.ticket.id,
            ticket.ticket.quantity,
            ticket.ticket.ticket_type,
            ticket.event_date_formatted,
            ticket.ticket.qr_code
        );
    }
    println!("   Total paid for these: {}", confirmation.total_amount_formatted);

    let vip_left = store
        .state(|s| {
            s.catalog
                .event(&EventId::new("evt-pameran-batik"))
                .and_then(|e| e.ticket_type(&TicketTypeId::new("vip")))
                .map(|t| t.availability_label())
        })
        .await
        .unwrap_or_default();
    println!("   Curator Tour now: {vip_left}");

    if let Some(first) = confirmation.tickets.first() {
        store
            .send(StorefrontAction::CancelTicket(first.ticket.id.clone()))
            .await?;
        println!("\n🗑  Cancelled {}", first.ticket.id);
    }

    // ========== Declined card ==========

    println!("\n💳 Declined card payment");
    let declining = store_with(Arc::new(DecliningGateway::new("Card declined by issuer")));
    log_in(&declining).await?;
    book(
        &declining,
        "evt-jazz-gunung",
        &[("vip", 2)],
        BookingMode::BookNow,
    )
    .await?;

    let card = PaymentDetails::CreditCard(CardDetails {
        card_number: "4111111111111111".to_string(),
        expiry_date: "12/27".to_string(),
        cvv: "123".to_string(),
        cardholder_name: "Budi Santoso".to_string(),
    });
    let outcome = pay(&declining, card).await?;
    let cart_lines = declining.state(|s| s.cart.len()).await;
    if let StorefrontAction::PaymentFailed { reason, .. } = outcome {
        println!("✗ Payment failed ({reason}), cart still has {cart_lines} line(s)");
    }

    store.shutdown(WAIT).await?;
    declining.shutdown(WAIT).await?;

    println!("\n✓ Demo finished\n");
    Ok(())
}
