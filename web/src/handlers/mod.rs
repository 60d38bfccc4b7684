//! HTTP request handlers shared by Loket services.

pub mod health;

pub use health::{health_check, health_check_with_store, render_metrics};
