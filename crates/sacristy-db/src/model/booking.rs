//! Booking rows, the stored templates the recurrence expander materializes.
//!
//! The date and time columns are deliberately `TEXT`: rows imported from the
//! legacy system carry dates as `DD/MM/YYYY` or `YYYY-MM-DD` and times as
//! `HH:MM` or `HH:MM:SS`, and malformed values must stay loadable. Parsing
//! belongs to the expander, which skips rows it cannot make sense of.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::RepeatKind;
use crate::db::schema::booking;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = booking)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Booking {
    pub id: Uuid,
    pub description: String,
    pub room_id: Option<Uuid>,
    /// Calendar date for one-shot bookings, in either legacy textual form.
    pub booking_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub repeat: RepeatKind,
    /// Weekday name (weekly) or day-of-month (monthly), as entered.
    pub repeat_day: Option<String>,
    pub user_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = booking)]
pub struct NewBooking<'a> {
    pub id: Uuid,
    pub description: &'a str,
    pub room_id: Option<Uuid>,
    pub booking_date: Option<&'a str>,
    pub start_time: Option<&'a str>,
    pub end_time: Option<&'a str>,
    pub repeat: RepeatKind,
    pub repeat_day: Option<&'a str>,
    pub user_id: Uuid,
}

/// Full-replace changeset for `PUT /api/bookings/<booking_id>`.
///
/// The owning `user_id` is not part of the changeset; ownership does not move
/// on edit.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = booking)]
#[diesel(treat_none_as_null = true)]
pub struct BookingChanges<'a> {
    pub description: &'a str,
    pub room_id: Option<Uuid>,
    pub booking_date: Option<&'a str>,
    pub start_time: Option<&'a str>,
    pub end_time: Option<&'a str>,
    pub repeat: RepeatKind,
    pub repeat_day: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
