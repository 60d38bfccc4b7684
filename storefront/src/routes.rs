//! Logical navigation routes.
//!
//! Responses carry one of these as a `next` hint, the way the pages of a
//! browser client would redirect after an action.

use crate::types::EventId;
use serde::{Serialize, Serializer};
use std::fmt;

/// A page of the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/events`
    Events,
    /// `/events/{id}`
    Event(EventId),
    /// `/cart`
    Cart,
    /// `/checkout`
    Checkout,
    /// `/booking-confirmation`
    BookingConfirmation,
    /// `/tickets`
    Tickets,
    /// `/login`
    Login,
    /// `/register`
    Register,
}

impl Route {
    /// Path of the route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Events => "/events".to_string(),
            Self::Event(id) => format!("/events/{id}"),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::BookingConfirmation => "/booking-confirmation".to_string(),
            Self::Tickets => "/tickets".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
