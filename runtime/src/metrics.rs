//! Prometheus metrics for observability and monitoring.
//!
//! The store records `store.*` counters and histograms through the `metrics`
//! facade. [`PrometheusMetrics::install`] wires a Prometheus recorder behind
//! that facade and hands back a handle the HTTP layer renders at `/metrics`.
//!
//! # Example
//!
//! ```rust,no_run
//! use loket_runtime::metrics::PrometheusMetrics;
//!
//! let metrics = PrometheusMetrics::install()?;
//! let body = metrics.render();
//! # let _ = body;
//! # Ok::<(), loket_runtime::metrics::MetricsError>(())
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

// Re-export metrics macros for use in other crates
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installed Prometheus recorder.
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: PrometheusHandle,
}

impl PrometheusMetrics {
    /// Install the global Prometheus recorder.
    ///
    /// A recorder can only be installed once per process. When one is
    /// already present (e.g., in tests) this returns a detached handle
    /// instead of failing, so rendering keeps working.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if the exporter cannot be built or installed.
    pub fn install() -> Result<Self, MetricsError> {
        let builder = Self::builder()?;

        match builder.install_recorder() {
            Ok(handle) => {
                register_metrics();
                tracing::info!("Prometheus recorder installed");
                Ok(Self { handle })
            },
            Err(BuildError::FailedToSetGlobalRecorder(_)) => {
                tracing::warn!("Metrics recorder already initialized, using detached handle");
                Self::detached()
            },
            Err(e) => Err(MetricsError::Install(e.to_string())),
        }
    }

    /// Build a recorder without installing it globally.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Build`] if bucket configuration is rejected.
    pub fn detached() -> Result<Self, MetricsError> {
        let recorder = Self::builder()?.build_recorder();
        Ok(Self {
            handle: recorder.handle(),
        })
    }

    fn builder() -> Result<PrometheusBuilder, MetricsError> {
        PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_01, 0.000_1, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))
    }

    /// Render current metrics in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

/// Register descriptions for the metrics the store emits.
fn register_metrics() {
    describe_counter!("store.commands.total", "Total number of actions sent to stores");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken by a single reducer call"
    );
    describe_counter!(
        "store.effects.executed",
        "Effects started by stores, labelled by effect type"
    );
    describe_counter!(
        "store.effects.cancelled",
        "Cancellable effects aborted before completion"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );
}
