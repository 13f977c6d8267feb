//! Domain models - core business types
//!
//! This module contains the canonical data types used throughout the system:
//! - `Currency` - supported display currencies and the static rate table
//! - `Retreat` / `RoomTier` - the bookable catalog entities
//! - `GuestDetails` - guest input collected by the booking flow
//! - `Booking` - the accumulating record for one in-progress booking

pub mod booking;
pub mod currency;
pub mod types;

// Re-export commonly used types at module level
pub use booking::Booking;
pub use currency::{Amount, Currency};
pub use types::{GuestDetails, Retreat, RoomTier};
