//! Booking schedule materialization.
//!
//! ## Module Organization
//!
//! - `dates`: parsing of the legacy textual date and time forms
//! - `expander`: recurrence expansion of booking rows into occurrences
//! - `weekday`: weekday-name lookup (Portuguese and English)

pub mod dates;
pub mod expander;
pub mod weekday;

pub use expander::{ExpansionWindow, Occurrence, RoomFilter, expand_bookings};
