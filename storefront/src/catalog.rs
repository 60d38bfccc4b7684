//! Event catalog and its seed data.
//!
//! Events and tiers are fixed at startup. The only thing that changes at
//! runtime is `TicketType::available`, and only through the reducer.

use crate::error::StorefrontError;
use crate::types::{
    CartKey, Event, EventId, EventType, Money, Ticket, TicketId, TicketStatus, TicketTier,
    TicketType, TicketTypeId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The list of events on sale, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    /// Creates a catalog from a list of events
    #[must_use]
    pub const fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// All events
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events of one type, or all of them
    pub fn filter(&self, event_type: Option<EventType>) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| event_type.is_none_or(|t| e.event_type == t))
    }

    /// Looks up an event
    #[must_use]
    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Looks up an event, failing with [`StorefrontError::EventNotFound`]
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` when no event has this id.
    pub fn require_event(&self, id: &EventId) -> Result<&Event, StorefrontError> {
        self.event(id).ok_or_else(|| StorefrontError::EventNotFound {
            event_id: id.clone(),
        })
    }

    /// Looks up the event and tier behind a cart key
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` or `TicketTypeNotFound`.
    pub fn resolve(&self, key: &CartKey) -> Result<(&Event, &TicketType), StorefrontError> {
        let event = self.require_event(&key.event_id)?;
        let tier = event
            .ticket_type(&key.ticket_type_id)
            .ok_or_else(|| StorefrontError::TicketTypeNotFound {
                event_id: key.event_id.clone(),
                ticket_type_id: key.ticket_type_id.clone(),
            })?;
        Ok((event, tier))
    }

    /// Takes `quantity` tickets off a tier, never going below zero.
    ///
    /// Returns the remaining availability, or `None` for an unknown key.
    pub fn decrement(&mut self, key: &CartKey, quantity: u32) -> Option<u32> {
        let tier = self
            .events
            .iter_mut()
            .find(|e| e.id == key.event_id)?
            .ticket_type_mut(&key.ticket_type_id)?;
        tier.available = tier.available.saturating_sub(quantity);
        Some(tier.available)
    }

    /// Catalog seeded with the demo events
    #[must_use]
    #[allow(clippy::too_many_lines)] // Seed data is long but flat
    pub fn seed() -> Self {
        Self::new(vec![
            Event {
                id: EventId::new("evt-jazz-gunung"),
                title: "Jazz Gunung Bromo".to_string(),
                event_type: EventType::Concert,
                date: date(2025, 7, 19),
                time: "16:00".to_string(),
                location: "Amfiteater Jiwa Jawa, Probolinggo".to_string(),
                capacity: 2_000,
                participants: 1_240,
                description: "Open-air jazz on the rim of the Tengger caldera.".to_string(),
                image: "/images/jazz-gunung.jpg".to_string(),
                ticket_types: vec![
                    tier("regular", "Festival", 350_000, 1_200, 480, TicketTier::Regular, &[
                        "General admission",
                    ]),
                    tier("vip", "VIP", 750_000, 600, 95, TicketTier::Vip, &[
                        "Reserved seating",
                        "Welcome drink",
                    ]),
                    tier("vvip", "VVIP", 1_500_000, 200, 0, TicketTier::Vvip, &[
                        "Front row seating",
                        "Artist meet and greet",
                        "Dinner",
                    ]),
                ],
            },
            Event {
                id: EventId::new("evt-pesta-rakyat"),
                title: "Pesta Rakyat Jakarta".to_string(),
                event_type: EventType::Concert,
                date: date(2025, 8, 17),
                time: "19:00".to_string(),
                location: "Gelora Bung Karno, Jakarta".to_string(),
                capacity: 50_000,
                participants: 31_500,
                description: "Independence day concert with a line-up of national artists."
                    .to_string(),
                image: "/images/pesta-rakyat.jpg".to_string(),
                ticket_types: vec![
                    tier("regular", "Tribune", 250_000, 40_000, 12_000, TicketTier::Regular, &[
                        "Tribune seating",
                    ]),
                    tier("vip", "VIP Floor", 500_000, 8_000, 2_100, TicketTier::Vip, &[
                        "Floor access",
                        "Express entry",
                    ]),
                    tier("vvip", "VVIP Lounge", 2_500_000, 2_000, 150, TicketTier::Vvip, &[
                        "Lounge access",
                        "Free flow beverages",
                        "Merchandise pack",
                    ]),
                ],
            },
            Event {
                id: EventId::new("evt-pameran-batik"),
                title: "Pameran Batik Nusantara".to_string(),
                event_type: EventType::Exhibition,
                date: date(2025, 10, 2),
                time: "10:00".to_string(),
                location: "Museum Tekstil, Jakarta".to_string(),
                capacity: 800,
                participants: 310,
                description: "Three centuries of batik from across the archipelago.".to_string(),
                image: "/images/pameran-batik.jpg".to_string(),
                ticket_types: vec![
                    tier("regular", "Day Pass", 75_000, 600, 290, TicketTier::Regular, &[
                        "Exhibition access",
                    ]),
                    tier("vip", "Curator Tour", 200_000, 200, 3, TicketTier::Vip, &[
                        "Guided tour",
                        "Exhibition catalogue",
                    ]),
                ],
            },
            Event {
                id: EventId::new("evt-seminar-startup"),
                title: "Startup Summit Indonesia".to_string(),
                event_type: EventType::Seminar,
                date: date(2025, 11, 12),
                time: "09:00".to_string(),
                location: "ICE BSD, Tangerang".to_string(),
                capacity: 1_500,
                participants: 900,
                description: "Founders and investors on building for the Indonesian market."
                    .to_string(),
                image: "/images/startup-summit.jpg".to_string(),
                ticket_types: vec![
                    tier("regular", "Delegate", 150_000, 1_200, 600, TicketTier::Regular, &[
                        "All sessions",
                        "Lunch",
                    ]),
                    tier("vip", "Executive", 500_000, 300, 40, TicketTier::Vip, &[
                        "All sessions",
                        "Networking dinner",
                        "Recordings",
                    ]),
                ],
            },
        ])
    }
}

/// Tickets the demo user already holds: one upcoming, one used.
#[must_use]
pub fn seed_tickets() -> Vec<Ticket> {
    vec![
        Ticket {
            id: TicketId::new("T-SEED-001"),
            event_id: EventId::new("evt-pesta-rakyat"),
            event_title: "Pesta Rakyat Jakarta".to_string(),
            ticket_type: "VIP Floor".to_string(),
            quantity: 2,
            total_price: Money::from_rupiah(1_000_000),
            purchase_date: date(2024, 12, 20),
            event_date: date(2025, 8, 17),
            status: TicketStatus::Active,
            qr_code: "QR-SEED-001".to_string(),
        },
        Ticket {
            id: TicketId::new("T-SEED-002"),
            event_id: EventId::new("evt-seminar-startup"),
            event_title: "Startup Summit 2024".to_string(),
            ticket_type: "Delegate".to_string(),
            quantity: 1,
            total_price: Money::from_rupiah(150_000),
            purchase_date: date(2024, 9, 1),
            event_date: date(2024, 11, 13),
            status: TicketStatus::Used,
            qr_code: "QR-SEED-002".to_string(),
        },
    ]
}

fn tier(
    id: &str,
    name: &str,
    price: u64,
    quota: u32,
    available: u32,
    tier: TicketTier,
    features: &[&str],
) -> TicketType {
    TicketType {
        id: TicketTypeId::new(id),
        name: name.to_string(),
        price: Money::from_rupiah(price),
        quota,
        available,
        features: features.iter().map(ToString::to_string).collect(),
        tier,
    }
}

// Seed dates are literals; an invalid one falls back to the minimum date.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_invariants() {
        let catalog = Catalog::seed();
        assert!(!catalog.events().is_empty());
        for event in catalog.events() {
            for tier in &event.ticket_types {
                assert!(tier.available <= tier.quota, "{}/{}", event.id, tier.id);
            }
        }
    }

    #[test]
    fn test_filter_by_type() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.filter(None).count(), catalog.events().len());
        assert!(
            catalog
                .filter(Some(EventType::Seminar))
                .all(|e| e.event_type == EventType::Seminar)
        );
        assert_eq!(catalog.filter(Some(EventType::Exhibition)).count(), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = Catalog::seed();
        assert_eq!(
            catalog.resolve(&CartKey::new("missing", "vip")).err(),
            Some(StorefrontError::EventNotFound { event_id: EventId::new("missing") })
        );
        assert!(matches!(
            catalog.resolve(&CartKey::new("evt-jazz-gunung", "balcony")),
            Err(StorefrontError::TicketTypeNotFound { .. })
        ));
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut catalog = Catalog::seed();
        let key = CartKey::new("evt-pameran-batik", "vip");

        assert_eq!(catalog.decrement(&key, 2), Some(1));
        assert_eq!(catalog.decrement(&key, 5), Some(0));
        assert_eq!(catalog.decrement(&CartKey::new("missing", "vip"), 1), None);
    }

    #[test]
    fn test_seed_tickets_statuses() {
        let tickets = seed_tickets();
        assert_eq!(tickets.iter().filter(|t| t.is_active()).count(), 1);
        assert!(tickets.iter().any(|t| t.status == TicketStatus::Used));
    }
}
