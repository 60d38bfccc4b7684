//! Injected dependencies of the storefront reducer.

use crate::checkout::DEFAULT_SERVICE_FEE_BPS;
use crate::payment_gateway::PaymentGateway;
use loket_core::environment::{Clock, IdGenerator};
use std::sync::Arc;
use std::time::Duration;

/// Longest a single charge may take before it counts as failed
pub const DEFAULT_PAYMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment dependencies for the storefront reducer
#[derive(Clone)]
pub struct StorefrontEnvironment {
    /// Clock for purchase dates
    pub clock: Arc<dyn Clock>,
    /// Source of ticket ids and QR tokens
    pub ids: Arc<dyn IdGenerator>,
    /// Charges the order total at checkout
    pub gateway: Arc<dyn PaymentGateway>,
    /// Service fee in basis points of the subtotal
    pub service_fee_bps: u32,
    /// Upper bound on one gateway charge
    pub payment_timeout: Duration,
}

impl StorefrontEnvironment {
    /// Creates a new `StorefrontEnvironment` with the default 5% service fee
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            clock,
            ids,
            gateway,
            service_fee_bps: DEFAULT_SERVICE_FEE_BPS,
            payment_timeout: DEFAULT_PAYMENT_TIMEOUT,
        }
    }

    /// Overrides the service fee
    #[must_use]
    pub const fn with_service_fee_bps(mut self, bps: u32) -> Self {
        self.service_fee_bps = bps;
        self
    }

    /// Overrides the charge timeout
    #[must_use]
    pub const fn with_payment_timeout(mut self, timeout: Duration) -> Self {
        self.payment_timeout = timeout;
        self
    }
}
