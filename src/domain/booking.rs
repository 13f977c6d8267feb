//! Booking record accumulated by the wizard
//!
//! A booking exists only in the wizard session that owns it. The
//! reference is a locally generated token, not a reservation in any
//! backing store.

use crate::domain::types::{GuestDetails, RoomTier};
use uuid::Uuid;

/// Length of the human-facing booking reference.
const REFERENCE_LEN: usize = 8;

/// Generate a booking reference: the first 8 chars of a fresh UUIDv4,
/// uppercased. Collisions are accepted as negligible and not checked
/// against any store.
pub fn new_booking_reference() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..REFERENCE_LEN].to_uppercase()
}

/// The accumulating record for one in-progress booking.
#[derive(Debug, Clone)]
pub struct Booking {
    pub retreat_slug: String,
    pub retreat_title: String,
    pub date_range: String,
    pub selected_room: Option<RoomTier>,
    pub guest_details: Option<GuestDetails>,
    pub payment_complete: bool,
    pub reference: Option<String>,
}

impl Booking {
    pub fn new(retreat_slug: &str, retreat_title: &str, date_range: &str) -> Self {
        Self {
            retreat_slug: retreat_slug.to_string(),
            retreat_title: retreat_title.to_string(),
            date_range: date_range.to_string(),
            selected_room: None,
            guest_details: None,
            payment_complete: false,
            reference: None,
        }
    }
}
