//! Storefront reducer.
//!
//! Cart and ticket actions are plain state transitions. Checkout is the one
//! flow with effects: `CHECKOUT` validates and starts a cancellable payment
//! effect, whose outcome comes back as `PAYMENT_SUCCEEDED` or
//! `PAYMENT_FAILED`. Inventory is decremented inside `PAYMENT_SUCCEEDED`, so
//! every reader sees catalog, cart and tickets change together. While a payment
//! runs, cart edits are refused and `LOGOUT` aborts the payment first.

use crate::actions::StorefrontAction;
use crate::checkout::{self, OrderSummary};
use crate::environment::StorefrontEnvironment;
use crate::error::StorefrontError;
use crate::metrics::{self, CheckoutOutcome};
use crate::payment_gateway::{PaymentGatewayError, PaymentReceipt};
use crate::state::{CheckoutStatus, Confirmation, StorefrontState};
use crate::types::{
    CartItem, CartKey, CartQuantity, CheckoutAttempt, PaymentDetails, Ticket, TicketId,
    TicketStatus,
};
use loket_core::effect::{Effect, EffectId};
use loket_core::{async_effect, cancellable, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Id under which the running payment effect is registered
pub const CHECKOUT_EFFECT: &str = "checkout";

/// Reducer for the storefront
#[derive(Clone, Debug, Default)]
pub struct StorefrontReducer;

impl StorefrontReducer {
    /// Creates a new `StorefrontReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ========== Cart ==========

    /// Refuses cart edits while a payment is running.
    fn cart_locked(state: &mut StorefrontState) -> bool {
        let Some(attempt) = state.checkout.attempt() else {
            return false;
        };
        tracing::warn!(%attempt, "Cart change during payment ignored");
        state.last_error = Some(StorefrontError::CheckoutInProgress);
        true
    }

    fn add_to_cart(state: &mut StorefrontState, item: CartItem) {
        let key = item.key();
        match state.cart.iter_mut().find(|line| line.matches(&key)) {
            // Overwrite, the selector always sends the absolute quantity
            Some(line) => line.quantity = item.quantity,
            None => state.cart.push(item),
        }
    }

    fn remove_from_cart(state: &mut StorefrontState, key: &CartKey) {
        state.cart.retain(|line| !line.matches(key));
    }

    fn update_quantity(state: &mut StorefrontState, update: &CartQuantity) {
        let key = CartKey {
            event_id: update.event_id.clone(),
            ticket_type_id: update.ticket_type_id.clone(),
        };
        if let Some(line) = state.cart.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = update.quantity;
        }
    }

    // ========== Tickets ==========

    fn purchase(state: &mut StorefrontState, tickets: Vec<Ticket>) {
        state.tickets.extend(tickets);
        state.cart.clear();
    }

    fn cancel_ticket(state: &mut StorefrontState, id: &TicketId) {
        match state.tickets.iter_mut().find(|t| &t.id == id) {
            Some(ticket) if ticket.status == TicketStatus::Active => {
                ticket.status = TicketStatus::Cancelled;
                metrics::record_ticket_cancelled();
                tracing::info!(ticket_id = %id, "Ticket cancelled");
            },
            Some(ticket) => {
                tracing::debug!(ticket_id = %id, status = ?ticket.status, "Ticket not active, cancel ignored");
            },
            None => tracing::debug!(ticket_id = %id, "Unknown ticket, cancel ignored"),
        }
    }

    // ========== Checkout ==========

    fn reject(
        state: &mut StorefrontState,
        attempt: CheckoutAttempt,
        error: StorefrontError,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        tracing::info!(%attempt, error = %error, "Checkout rejected");
        metrics::record_checkout(CheckoutOutcome::Rejected);
        state.last_error = Some(error.clone());
        smallvec![async_effect! {
            Some(StorefrontAction::CheckoutRejected { attempt, error })
        }]
    }

    fn start_checkout(
        state: &mut StorefrontState,
        attempt: CheckoutAttempt,
        payment: &PaymentDetails,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        let lines = match checkout::validate(state, payment) {
            Ok(lines) => lines,
            Err(error) => return Self::reject(state, attempt, error),
        };

        let summary = OrderSummary::from_lines(&lines, env.service_fee_bps);
        let method = payment.method();

        state.checkout = CheckoutStatus::InFlight {
            attempt,
            method,
            lines,
            summary,
        };
        state.last_error = None;
        metrics::record_checkout(CheckoutOutcome::Started);
        tracing::info!(
            %attempt,
            method = method.label(),
            total = summary.total.rupiah(),
            "Checkout started"
        );

        let gateway = Arc::clone(&env.gateway);
        let timeout = env.payment_timeout;

        smallvec![cancellable! {
            id: CHECKOUT_EFFECT,
            effect: async_effect! {
                let charge = gateway.charge(summary.total, method);
                let result = tokio::time::timeout(timeout, charge)
                    .await
                    .unwrap_or(Err(PaymentGatewayError::Timeout));

                Some(match result {
                    Ok(receipt) => StorefrontAction::PaymentSucceeded { attempt, receipt },
                    Err(error) => StorefrontAction::PaymentFailed {
                        attempt,
                        reason: error.to_string(),
                    },
                })
            }
        }]
    }

    /// Takes the running checkout if it belongs to `attempt`.
    fn take_in_flight(
        state: &mut StorefrontState,
        attempt: CheckoutAttempt,
    ) -> Option<(Vec<CartItem>, OrderSummary)> {
        if state.checkout.attempt() != Some(attempt) {
            tracing::warn!(%attempt, "Payment outcome for a checkout that is not running, ignored");
            return None;
        }

        match std::mem::take(&mut state.checkout) {
            CheckoutStatus::InFlight { lines, summary, .. } => Some((lines, summary)),
            CheckoutStatus::Idle => None,
        }
    }

    fn complete_checkout(
        state: &mut StorefrontState,
        attempt: CheckoutAttempt,
        receipt: PaymentReceipt,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        let Some((lines, summary)) = Self::take_in_flight(state, attempt) else {
            return SmallVec::new();
        };

        if let Err(error) = checkout::validate_availability(&state.catalog, &lines) {
            return Self::reject(state, attempt, error);
        }

        let purchase_date = env.clock.now().date_naive();
        let tickets =
            match checkout::build_tickets(&state.catalog, &lines, purchase_date, env.ids.as_ref()) {
                Ok(tickets) => tickets,
                Err(error) => return Self::reject(state, attempt, error),
            };

        for line in &lines {
            state.catalog.decrement(&line.key(), line.quantity);
        }

        let ticket_ids = tickets.iter().map(|t| t.id.clone()).collect();
        Self::purchase(state, tickets);

        state.last_error = None;
        state.last_confirmation = Some(Confirmation {
            attempt,
            ticket_ids,
            summary,
            receipt,
        });

        metrics::record_checkout(CheckoutOutcome::Succeeded);
        metrics::record_sale(summary.item_count, summary.total);
        tracing::info!(
            %attempt,
            tickets = lines.len(),
            total = summary.total.rupiah(),
            "Checkout completed"
        );

        SmallVec::new()
    }

    fn fail_checkout(
        state: &mut StorefrontState,
        attempt: CheckoutAttempt,
        reason: &str,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        if Self::take_in_flight(state, attempt).is_some() {
            state.last_error = Some(StorefrontError::PaymentFailed);
            metrics::record_checkout(CheckoutOutcome::Failed);
            tracing::warn!(%attempt, reason, "Payment failed, cart kept");
        }
        SmallVec::new()
    }

    fn abort_checkout(state: &mut StorefrontState) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        let attempt = state.checkout.attempt();
        let mut effects: SmallVec<[Effect<StorefrontAction>; 4]> = SmallVec::new();

        if let Some(running) = attempt {
            state.checkout = CheckoutStatus::Idle;
            metrics::record_checkout(CheckoutOutcome::Aborted);
            tracing::info!(attempt = %running, "Checkout aborted, cart kept");
            effects.push(Effect::Cancel(EffectId::new(CHECKOUT_EFFECT)));
        }

        effects.push(async_effect! {
            Some(StorefrontAction::CheckoutAborted { attempt })
        });
        effects
    }
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // The cart is what the running payment charges for
        if action.edits_cart() && Self::cart_locked(state) {
            return SmallVec::new();
        }

        match action {
            // ========== Session ==========
            StorefrontAction::Login(user) => {
                tracing::info!(user_id = %user.id, "User logged in");
                state.user = Some(user);
                state.is_authenticated = true;
            },
            StorefrontAction::Logout => {
                let effects = if state.checkout.is_in_flight() {
                    Self::abort_checkout(state)
                } else {
                    SmallVec::new()
                };
                state.user = None;
                state.is_authenticated = false;
                state.cart.clear();
                return effects;
            },

            // ========== Cart ==========
            StorefrontAction::AddToCart(item) => Self::add_to_cart(state, item),
            StorefrontAction::RemoveFromCart(key) => Self::remove_from_cart(state, &key),
            StorefrontAction::UpdateCartQuantity(update) => Self::update_quantity(state, &update),
            StorefrontAction::ClearCart => state.cart.clear(),

            // ========== Tickets ==========
            StorefrontAction::PurchaseTickets(tickets) => Self::purchase(state, tickets),
            StorefrontAction::CancelTicket(id) => Self::cancel_ticket(state, &id),

            // ========== Checkout ==========
            StorefrontAction::Checkout { attempt, payment } => {
                return Self::start_checkout(state, attempt, &payment, env);
            },
            StorefrontAction::PaymentSucceeded { attempt, receipt } => {
                return Self::complete_checkout(state, attempt, receipt, env);
            },
            StorefrontAction::PaymentFailed { attempt, reason } => {
                return Self::fail_checkout(state, attempt, &reason);
            },
            StorefrontAction::AbortCheckout => return Self::abort_checkout(state),

            // Notifications only, state was updated when they were emitted
            StorefrontAction::CheckoutRejected { .. }
            | StorefrontAction::CheckoutAborted { .. }
            | StorefrontAction::Unknown => {},
        }

        SmallVec::new()
    }
}
