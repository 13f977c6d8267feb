//! Retreat catalog and guest types
//!
//! Catalog entities are loaded from the CMS export and immutable after
//! load; the booking flow selects them, never mutates them.

use crate::domain::currency::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A priced accommodation option within a retreat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTier {
    pub id: String,
    pub name: String,
    pub bed_configuration: String,
    pub occupancy: u8,
    /// Discounted price active before the early-bird cutoff. Treated as
    /// a static alternate price, not a time-gated rule.
    pub price_early_bird: Amount,
    pub price_regular: Amount,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// A bookable multi-day trip product with fixed dates and room-tier pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retreat {
    pub slug: String,
    pub title: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Preformatted display string, e.g. "March 14-21, 2026".
    pub date_range: String,
    #[serde(default)]
    pub room_tiers: Vec<RoomTier>,
}

impl Retreat {
    pub fn available_tiers(&self) -> impl Iterator<Item = &RoomTier> + '_ {
        self.room_tiers.iter().filter(|t| t.available)
    }

    pub fn has_availability(&self) -> bool {
        self.room_tiers.iter().any(|t| t.available)
    }

    pub fn tier(&self, id: &str) -> Option<&RoomTier> {
        self.room_tiers.iter().find(|t| t.id == id)
    }
}

/// Guest input from the details step. Set once, immutable for the rest
/// of the session. Field validation happens in the details form, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_country_code: String,
    pub phone: String,
    #[serde(default)]
    pub dietary_restrictions: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub special_requests: String,
}
