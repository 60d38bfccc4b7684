//! Payment gateway abstraction and the simulated gateway used by default.
//!
//! No real money moves anywhere in the storefront. [`SimulatedGateway`]
//! waits for a per-method latency and approves the charge; tests swap in
//! gateways that answer immediately or decline.

use crate::types::{Money, PaymentMethod};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, PaymentGatewayError>;

/// Payment gateway error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentGatewayError {
    /// Charge refused by the issuer or wallet
    #[error("Payment declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },
    /// Gateway did not answer in time
    #[error("Gateway timeout")]
    Timeout,
}

/// Proof of an approved charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    /// Gateway transaction reference
    pub transaction_id: String,
    /// Amount charged
    pub amount: Money,
    /// Method used
    pub method: PaymentMethod,
}

/// Payment gateway trait
///
/// Returned futures own everything they need so the store can run them
/// as detached, cancellable effects.
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` using `method`
    ///
    /// # Errors
    ///
    /// Returns error if the charge is declined or times out.
    fn charge(
        &self,
        amount: Money,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>>;
}

/// Simulated processing time per payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentLatency {
    /// Card payments
    pub credit_card: Duration,
    /// Bank transfers
    pub bank_transfer: Duration,
    /// E-wallets
    pub e_wallet: Duration,
}

impl PaymentLatency {
    /// Latency for one method
    #[must_use]
    pub const fn for_method(&self, method: PaymentMethod) -> Duration {
        match method {
            PaymentMethod::CreditCard => self.credit_card,
            PaymentMethod::BankTransfer => self.bank_transfer,
            PaymentMethod::EWallet(_) => self.e_wallet,
        }
    }

    /// No latency at all
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            credit_card: Duration::ZERO,
            bank_transfer: Duration::ZERO,
            e_wallet: Duration::ZERO,
        }
    }
}

impl Default for PaymentLatency {
    fn default() -> Self {
        Self {
            credit_card: Duration::from_millis(2_000),
            bank_transfer: Duration::from_millis(1_000),
            e_wallet: Duration::from_millis(1_500),
        }
    }
}

/// Gateway that sleeps for the method latency, then approves.
#[derive(Clone, Debug, Default)]
pub struct SimulatedGateway {
    latency: PaymentLatency,
}

impl SimulatedGateway {
    /// Creates a gateway with the given latencies
    #[must_use]
    pub const fn new(latency: PaymentLatency) -> Self {
        Self { latency }
    }

    /// Gateway that approves without waiting
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(PaymentLatency::instant())
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(latency: PaymentLatency) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(latency))
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(
        &self,
        amount: Money,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        let delay = self.latency.for_method(method);

        Box::pin(async move {
            tokio::time::sleep(delay).await;

            let transaction_id = format!("sim_txn_{}", uuid::Uuid::new_v4().simple());

            tracing::info!(
                amount = amount.rupiah(),
                method = method.label(),
                transaction_id = %transaction_id,
                "Simulated payment approved"
            );

            Ok(PaymentReceipt {
                transaction_id,
                amount,
                method,
            })
        })
    }
}

/// Gateway that declines every charge.
#[derive(Clone, Debug)]
pub struct DecliningGateway {
    reason: String,
}

impl DecliningGateway {
    /// Creates a gateway that declines with `reason`
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PaymentGateway for DecliningGateway {
    fn charge(
        &self,
        amount: Money,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        let reason = self.reason.clone();
        Box::pin(async move {
            tracing::info!(
                amount = amount.rupiah(),
                method = method.label(),
                reason = %reason,
                "Payment declined"
            );
            Err(PaymentGatewayError::Declined { reason })
        })
    }
}
