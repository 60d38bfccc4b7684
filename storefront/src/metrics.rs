//! Business metrics for the storefront.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `loket_checkouts_total{status}` - Checkouts by outcome (started, succeeded, failed, rejected, aborted)
//! - `loket_tickets_sold_total` - Admissions sold
//! - `loket_revenue_rupiah_total` - Amount charged, service fee included
//! - `loket_tickets_cancelled_total` - Tickets cancelled by their holder
//!
//! ## Histograms
//! - `loket_order_value_rupiah` - Total of each successful order

use crate::types::Money;
use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Outcome label of `loket_checkouts_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Payment effect started
    Started,
    /// Tickets issued
    Succeeded,
    /// Gateway declined or timed out
    Failed,
    /// Refused before payment
    Rejected,
    /// Aborted while paying
    Aborted,
}

impl CheckoutOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
            Self::Aborted => "aborted",
        }
    }
}

/// Register descriptions for all business metrics.
///
/// Call once at startup, after the recorder is installed.
pub fn register_business_metrics() {
    describe_counter!(
        "loket_checkouts_total",
        "Total number of checkouts by status (started, succeeded, failed, rejected, aborted)"
    );
    describe_counter!("loket_tickets_sold_total", "Total number of admissions sold");
    describe_counter!(
        "loket_revenue_rupiah_total",
        "Total amount charged in Rupiah, service fee included"
    );
    describe_counter!(
        "loket_tickets_cancelled_total",
        "Total number of tickets cancelled by their holder"
    );
    describe_histogram!("loket_order_value_rupiah", "Total of each successful order in Rupiah");

    tracing::info!("Business metrics registered");
}

/// Count a checkout outcome
pub fn record_checkout(outcome: CheckoutOutcome) {
    counter!("loket_checkouts_total", "status" => outcome.as_str()).increment(1);
}

/// Record a successful sale
#[allow(clippy::cast_precision_loss)] // Histogram values are approximate by nature
pub fn record_sale(admissions: u32, total: Money) {
    counter!("loket_tickets_sold_total").increment(u64::from(admissions));
    counter!("loket_revenue_rupiah_total").increment(total.rupiah());
    histogram!("loket_order_value_rupiah").record(total.rupiah() as f64);
}

/// Count a cancelled ticket
pub fn record_ticket_cancelled() {
    counter!("loket_tickets_cancelled_total").increment(1);
}
