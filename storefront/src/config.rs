//! Configuration management for the storefront.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Binaries call `dotenvy::dotenv()` first so a local `.env` file works too.

use crate::checkout::DEFAULT_SERVICE_FEE_BPS;
use crate::payment_gateway::PaymentLatency;
use loket_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Checkout configuration
    pub checkout: CheckoutConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// Outcome actions buffered per waiting request
    pub action_buffer: usize,
}

/// Checkout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Service fee in basis points (500 = 5%)
    pub service_fee_bps: u32,
    /// Simulated card payment latency in milliseconds
    pub card_latency_ms: u64,
    /// Simulated bank transfer latency in milliseconds
    pub bank_transfer_latency_ms: u64,
    /// Simulated e-wallet latency in milliseconds
    pub e_wallet_latency_ms: u64,
    /// Upper bound on one charge in milliseconds
    pub payment_timeout_ms: u64,
    /// How long an HTTP checkout waits for its outcome, in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env("PORT", 8080),
                log_level: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "loket_storefront=info,tower_http=debug".to_string()),
                shutdown_timeout: parse_env("SHUTDOWN_TIMEOUT", 30),
                action_buffer: parse_env("ACTION_BUFFER", 64),
            },
            checkout: CheckoutConfig {
                service_fee_bps: parse_env("SERVICE_FEE_BPS", DEFAULT_SERVICE_FEE_BPS),
                card_latency_ms: parse_env("CARD_LATENCY_MS", 2_000),
                bank_transfer_latency_ms: parse_env("BANK_TRANSFER_LATENCY_MS", 1_000),
                e_wallet_latency_ms: parse_env("E_WALLET_LATENCY_MS", 1_500),
                payment_timeout_ms: parse_env("PAYMENT_TIMEOUT_MS", 5_000),
                timeout_secs: parse_env("CHECKOUT_TIMEOUT_SECS", 10),
            },
        }
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Graceful shutdown budget
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }

    /// Store settings
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_broadcast_capacity(self.server.action_buffer)
    }
}

impl CheckoutConfig {
    /// Simulated gateway latencies
    #[must_use]
    pub const fn latency(&self) -> PaymentLatency {
        PaymentLatency {
            credit_card: Duration::from_millis(self.card_latency_ms),
            bank_transfer: Duration::from_millis(self.bank_transfer_latency_ms),
            e_wallet: Duration::from_millis(self.e_wallet_latency_ms),
        }
    }

    /// Upper bound on one charge
    #[must_use]
    pub const fn payment_timeout(&self) -> Duration {
        Duration::from_millis(self.payment_timeout_ms)
    }

    /// How long an HTTP checkout waits for its outcome
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        assert_eq!(parse_env("LOKET_TEST_SURELY_UNSET_VAR", 42_u32), 42);
    }

    #[test]
    fn test_latency_conversion() {
        let checkout = CheckoutConfig {
            service_fee_bps: 500,
            card_latency_ms: 2_000,
            bank_transfer_latency_ms: 1_000,
            e_wallet_latency_ms: 1_500,
            payment_timeout_ms: 5_000,
            timeout_secs: 10,
        };

        assert_eq!(checkout.latency(), PaymentLatency::default());
        assert_eq!(checkout.timeout(), Duration::from_secs(10));
        assert_eq!(checkout.payment_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_bind_address() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                log_level: "info".to_string(),
                shutdown_timeout: 5,
                action_buffer: 8,
            },
            checkout: CheckoutConfig {
                service_fee_bps: 500,
                card_latency_ms: 0,
                bank_transfer_latency_ms: 0,
                e_wallet_latency_ms: 0,
                payment_timeout_ms: 100,
                timeout_secs: 1,
            },
        };
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.store_config().broadcast_capacity, 8);
    }
}
