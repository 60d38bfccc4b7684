//! Event ticketing storefront built on Loket.
//!
//! A shopper browses a catalog of concerts, exhibitions and seminars, picks
//! ticket tiers, keeps them in a cart and pays for the cart at checkout.
//! Every transition goes through one [`StorefrontReducer`]; the payment itself
//! runs as a cancellable effect against an injected
//! [`payment_gateway::PaymentGateway`].
//!
//! # Architecture
//!
//! - **State**: [`StorefrontState`] holds session, catalog, cart and tickets
//! - **Actions**: [`StorefrontAction`] is the tagged action vocabulary
//! - **Reducer**: [`StorefrontReducer`] applies actions and returns effects
//! - **Views**: `cart`, `views` and `booking` derive pages from a snapshot
//! - **HTTP**: `api` handlers over a shared [`loket_runtime::Store`]
//!
//! # Example
//!
//! ```ignore
//! use loket_storefront::{server, Config};
//!
//! let config = Config::from_env();
//! let store = Arc::new(server::build_store(&config));
//! store.send(StorefrontAction::Login(user)).await?;
//! ```

pub mod actions;
pub mod api;
pub mod auth;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod environment;
pub mod error;
pub mod format;
pub mod metrics;
pub mod payment_gateway;
pub mod reducer;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;
pub mod views;

pub use actions::StorefrontAction;
pub use config::Config;
pub use environment::StorefrontEnvironment;
pub use error::StorefrontError;
pub use reducer::StorefrontReducer;
pub use state::StorefrontState;

use loket_runtime::Store;

/// The storefront's store
pub type StorefrontStore =
    Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;
