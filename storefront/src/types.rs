//! Domain types for the storefront.
//!
//! Identifiers are string newtypes so catalog ids like `"evt-jazz"` and
//! generated ticket ids share one shape. Money is whole Rupiah.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Unique identifier for an event in the catalog
    EventId
);
string_id!(
    /// Identifier of a ticket tier, unique within its event
    TicketTypeId
);
string_id!(
    /// Identifier of an issued ticket
    TicketId
);
string_id!(
    /// Identifier of a session user
    UserId
);

/// Identifier of one checkout attempt.
///
/// Every payment outcome carries the attempt it belongs to, so a late
/// result from an aborted attempt can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutAttempt(Uuid);

impl CheckoutAttempt {
    /// Creates a new random attempt id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an attempt id from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CheckoutAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CheckoutAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Money Value Object (whole Rupiah, IDR has no minor unit in practice)
// ============================================================================

/// Amount of money in whole Indonesian Rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero Rupiah
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from whole Rupiah
    #[must_use]
    pub const fn from_rupiah(rupiah: u64) -> Self {
        Self(rupiah)
    }

    /// Returns the amount in whole Rupiah
    #[must_use]
    pub const fn rupiah(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, saturating at `u64::MAX`
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies by a quantity, saturating at `u64::MAX`
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Proportional share in basis points (1/100 of a percent), rounded half-up.
    ///
    /// `Money::from_rupiah(1_000_000).basis_points(500)` is 50.000.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Clamped to u64::MAX before the cast
    pub fn basis_points(self, bps: u32) -> Self {
        let scaled = (u128::from(self.0) * u128::from(bps) + 5_000) / 10_000;
        Self(scaled.min(u128::from(u64::MAX)) as u64)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_currency(*self))
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Kind of event on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Live music
    Concert,
    /// Art or trade exhibition
    Exhibition,
    /// Talk or workshop
    Seminar,
}

impl EventType {
    /// Wire name of the type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Concert => "concert",
            Self::Exhibition => "exhibition",
            Self::Seminar => "seminar",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation tier of a ticket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketTier {
    /// General admission
    Regular,
    /// VIP
    Vip,
    /// VVIP
    Vvip,
}

/// A priced tier of admission to an event with its own inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    /// Tier id, unique within the event
    pub id: TicketTypeId,
    /// Display name ("VIP", "Early Bird")
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Total tickets ever offered for this tier
    pub quota: u32,
    /// Tickets still for sale, never above `quota`
    pub available: u32,
    /// Perks included with the tier
    pub features: Vec<String>,
    /// Presentation tier
    #[serde(rename = "color")]
    pub tier: TicketTier,
}

impl TicketType {
    /// Whether the tier has no tickets left
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.available == 0
    }

    /// Badge text shown next to the tier: `"12 left"` or `"Sold Out"`
    #[must_use]
    pub fn availability_label(&self) -> String {
        if self.is_sold_out() {
            "Sold Out".to_string()
        } else {
            format!("{} left", self.available)
        }
    }
}

/// A scheduled occasion offered for ticket sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event id
    pub id: EventId,
    /// Title
    pub title: String,
    /// Kind of event
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Calendar date of the event
    pub date: NaiveDate,
    /// Start time, local ("19:00")
    pub time: String,
    /// Venue
    pub location: String,
    /// Venue capacity
    pub capacity: u32,
    /// Participants registered so far
    pub participants: u32,
    /// Description
    pub description: String,
    /// Image path
    pub image: String,
    /// Tiers in display order
    pub ticket_types: Vec<TicketType>,
}

impl Event {
    /// Looks up a tier of this event
    #[must_use]
    pub fn ticket_type(&self, id: &TicketTypeId) -> Option<&TicketType> {
        self.ticket_types.iter().find(|t| &t.id == id)
    }

    /// Mutable lookup of a tier of this event
    pub fn ticket_type_mut(&mut self, id: &TicketTypeId) -> Option<&mut TicketType> {
        self.ticket_types.iter_mut().find(|t| &t.id == id)
    }
}

// ============================================================================
// Cart
// ============================================================================

/// Key of a cart line. A cart holds at most one line per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartKey {
    /// Event of the line
    pub event_id: EventId,
    /// Tier of the line
    pub ticket_type_id: TicketTypeId,
}

impl CartKey {
    /// Creates a cart key
    #[must_use]
    pub fn new(event_id: impl Into<EventId>, ticket_type_id: impl Into<TicketTypeId>) -> Self {
        Self {
            event_id: event_id.into(),
            ticket_type_id: ticket_type_id.into(),
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Event of the line
    pub event_id: EventId,
    /// Tier of the line
    pub ticket_type_id: TicketTypeId,
    /// Number of tickets
    pub quantity: u32,
    /// Unit price captured when the line was added
    pub price: Money,
}

impl CartItem {
    /// Whether this line belongs to `key`
    #[must_use]
    pub fn matches(&self, key: &CartKey) -> bool {
        self.event_id == key.event_id && self.ticket_type_id == key.ticket_type_id
    }

    /// Key of this line
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey {
            event_id: self.event_id.clone(),
            ticket_type_id: self.ticket_type_id.clone(),
        }
    }

    /// Unit price times quantity
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// New quantity for an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuantity {
    /// Event of the line
    pub event_id: EventId,
    /// Tier of the line
    pub ticket_type_id: TicketTypeId,
    /// New quantity
    pub quantity: u32,
}

// ============================================================================
// Tickets
// ============================================================================

/// Lifecycle status of an issued ticket.
///
/// Only `Active → Cancelled` happens at runtime. `Used` exists for
/// tickets that arrive with that status (seed data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Valid for entry
    Active,
    /// Cancelled by the holder
    Cancelled,
    /// Already scanned at the venue
    Used,
}

/// An issued, purchased admission record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket id
    pub id: TicketId,
    /// Event the ticket admits to
    pub event_id: EventId,
    /// Event title at purchase time
    pub event_title: String,
    /// Tier name at purchase time
    pub ticket_type: String,
    /// Number of admissions
    pub quantity: u32,
    /// Amount paid for this line
    pub total_price: Money,
    /// Day of purchase
    pub purchase_date: NaiveDate,
    /// Day of the event
    pub event_date: NaiveDate,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Token encoded in the entry QR code
    pub qr_code: String,
}

impl Ticket {
    /// Whether the ticket is still valid for entry
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TicketStatus::Active
    }
}

// ============================================================================
// Session
// ============================================================================

/// Session user. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: UserId,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
}

// ============================================================================
// Payment
// ============================================================================

/// E-wallet providers accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EWalletProvider {
    /// GoPay
    Gopay,
    /// OVO
    Ovo,
    /// DANA
    Dana,
    /// LinkAja
    Linkaja,
}

/// Card fields entered at checkout.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Card number
    pub card_number: String,
    /// Expiry, `MM/YY`
    pub expiry_date: String,
    /// Security code
    pub cvv: String,
    /// Name on the card
    pub cardholder_name: String,
}

impl CardDetails {
    /// Whether every field holds something other than whitespace
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.card_number,
            &self.expiry_date,
            &self.cvv,
            &self.cardholder_name,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

// Card data stays out of logs.
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4: String = self
            .card_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        f.debug_struct("CardDetails")
            .field("card_number", &format_args!("****{last4}"))
            .field("cardholder_name", &self.cardholder_name)
            .finish_non_exhaustive()
    }
}

/// Payment chosen at checkout, with the fields that method needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentDetails {
    /// Credit or debit card
    CreditCard(CardDetails),
    /// Manual bank transfer
    BankTransfer,
    /// E-wallet
    EWallet {
        /// Wallet provider
        provider: EWalletProvider,
    },
}

impl PaymentDetails {
    /// Method without its fields
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::CreditCard(_) => PaymentMethod::CreditCard,
            Self::BankTransfer => PaymentMethod::BankTransfer,
            Self::EWallet { provider } => PaymentMethod::EWallet(*provider),
        }
    }
}

/// Payment method without sensitive fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit or debit card
    CreditCard,
    /// Manual bank transfer
    BankTransfer,
    /// E-wallet
    EWallet(EWalletProvider),
}

impl PaymentMethod {
    /// Metric label for the method
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::BankTransfer => "bank_transfer",
            Self::EWallet(_) => "e_wallet",
        }
    }
}
