//! Recurrence expansion: booking rows in, concrete calendar occurrences out.
//!
//! The expander is pure and stateless. It walks a bounded future window day
//! by day, applying the repeat rule of each booking as a match predicate,
//! and never fails on a malformed row: a booking the expander cannot make
//! sense of contributes zero occurrences and is trace-logged, because one
//! bad legacy import must not blank the whole calendar.

use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sacristy_core::constants::EXPANSION_WINDOW_MONTHS;
use sacristy_db::db::enums::RepeatKind;
use sacristy_db::model::booking::Booking;

use super::{dates, weekday};

/// The bounded future interval over which recurring bookings are
/// materialized. Start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ExpansionWindow {
    /// Window of [`EXPANSION_WINDOW_MONTHS`] months beginning at `start`.
    #[must_use]
    pub fn starting(start: NaiveDate) -> Self {
        let end = start
            .checked_add_months(Months::new(EXPANSION_WINDOW_MONTHS))
            .unwrap_or(start);
        Self { start, end }
    }

    /// Window beginning at today's UTC date.
    #[must_use]
    pub fn from_today() -> Self {
        Self::starting(Utc::now().date_naive())
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every calendar day in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day < end)
    }
}

/// Set of allowed room ids. The empty filter allows every room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilter(HashSet<Uuid>);

impl RoomFilter {
    /// Filter that allows every room.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allows(&self, room_id: Uuid) -> bool {
        self.0.is_empty() || self.0.contains(&room_id)
    }
}

impl FromIterator<Uuid> for RoomFilter {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One concrete calendar instance derived from a booking.
///
/// Never persisted; recomputed on every calendar read. Instants are naive
/// wall times because the legacy textual forms carry no timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Stable id within one expansion: the booking id for one-shot rows,
    /// `{booking_id}-{YYYY-MM-DD}` for recurring ones.
    pub key: String,
    pub booking_id: Uuid,
    pub room_id: Uuid,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// ## Summary
/// Expands booking rows into the flat occurrence list for the window.
///
/// Bookings outside the room filter are skipped before expansion. Bookings
/// missing a room or a parseable start/end time, one-shot bookings with an
/// unparseable date, and recurring bookings with an unresolvable
/// `repeat_day` each contribute zero occurrences without affecting the rest
/// of the batch. Given the same rows and the same window the output is
/// identical, in input order then day order.
#[must_use]
pub fn expand_bookings(
    bookings: &[Booking],
    filter: &RoomFilter,
    window: &ExpansionWindow,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for booking in bookings {
        let Some(room_id) = booking.room_id else {
            tracing::trace!(booking_id = %booking.id, "Skipping booking without a room");
            continue;
        };

        if !filter.allows(room_id) {
            continue;
        }

        let Some((start_time, end_time)) = parse_times(booking) else {
            tracing::trace!(booking_id = %booking.id, "Skipping booking with unusable times");
            continue;
        };

        let emit = |day: NaiveDate, key: String| Occurrence {
            key,
            booking_id: booking.id,
            room_id,
            description: booking.description.clone(),
            start: NaiveDateTime::new(day, start_time),
            end: NaiveDateTime::new(day, end_time),
        };

        match booking.repeat {
            RepeatKind::None => {
                let Some(day) = booking
                    .booking_date
                    .as_deref()
                    .and_then(dates::parse_legacy_date)
                else {
                    tracing::trace!(booking_id = %booking.id, "Skipping one-shot booking with unparseable date");
                    continue;
                };
                occurrences.push(emit(day, booking.id.to_string()));
            }
            RepeatKind::Day => {
                occurrences
                    .extend(window.days().map(|day| emit(day, recurring_key(booking, day))));
            }
            RepeatKind::Week => {
                let Some(target) = booking.repeat_day.as_deref().and_then(weekday::weekday_index)
                else {
                    tracing::trace!(booking_id = %booking.id, "Skipping weekly booking with unresolvable weekday");
                    continue;
                };
                occurrences.extend(
                    window
                        .days()
                        .filter(|day| day.weekday().num_days_from_sunday() == u32::from(target))
                        .map(|day| emit(day, recurring_key(booking, day))),
                );
            }
            RepeatKind::Month => {
                // A day-of-month beyond a month's length simply never
                // matches there; February has no 31st to emit on.
                let Some(target) = parse_day_of_month(booking.repeat_day.as_deref()) else {
                    tracing::trace!(booking_id = %booking.id, "Skipping monthly booking with unresolvable day-of-month");
                    continue;
                };
                occurrences.extend(
                    window
                        .days()
                        .filter(|day| day.day() == target)
                        .map(|day| emit(day, recurring_key(booking, day))),
                );
            }
        }
    }

    occurrences
}

fn recurring_key(booking: &Booking, day: NaiveDate) -> String {
    format!("{}-{}", booking.id, day.format("%Y-%m-%d"))
}

/// Both times must be present and parseable for a booking to expand.
fn parse_times(booking: &Booking) -> Option<(NaiveTime, NaiveTime)> {
    let start = dates::parse_legacy_time(booking.start_time.as_deref()?)?;
    let end = dates::parse_legacy_time(booking.end_time.as_deref()?)?;
    Some((start, end))
}

fn parse_day_of_month(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|day| (1..=31).contains(day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// 2026-01-01 is a Thursday; the window runs through 2026-06-30.
    fn window() -> ExpansionWindow {
        ExpansionWindow::starting(date(2026, 1, 1))
    }

    fn booking(repeat: RepeatKind, repeat_day: Option<&str>) -> Booking {
        Booking {
            id: Uuid::now_v7(),
            description: "Ensaio do coral".to_string(),
            room_id: Some(Uuid::now_v7()),
            booking_date: None,
            start_time: Some("19:00".to_string()),
            end_time: Some("21:00".to_string()),
            repeat,
            repeat_day: repeat_day.map(str::to_string),
            user_id: Uuid::nil(),
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    fn one_shot(raw_date: &str) -> Booking {
        Booking {
            booking_date: Some(raw_date.to_string()),
            ..booking(RepeatKind::None, None)
        }
    }

    #[test_log::test]
    fn test_window_is_six_months_end_exclusive() {
        let w = window();
        assert_eq!(w.start(), date(2026, 1, 1));
        assert_eq!(w.end(), date(2026, 7, 1));
        assert_eq!(w.days().count(), 181);
        assert_eq!(w.days().last(), Some(date(2026, 6, 30)));
    }

    #[test_log::test]
    fn test_one_shot_emits_exactly_once_for_either_date_form() {
        for raw in ["21/03/2026", "2026-03-21"] {
            let rows = vec![one_shot(raw)];
            let occurrences = expand_bookings(&rows, &RoomFilter::allow_all(), &window());

            assert_eq!(occurrences.len(), 1, "input {raw}");
            assert_eq!(occurrences[0].start.date(), date(2026, 3, 21));
            assert_eq!(
                occurrences[0].start.time(),
                NaiveTime::from_hms_opt(19, 0, 0).expect("valid time")
            );
            assert_eq!(
                occurrences[0].end.time(),
                NaiveTime::from_hms_opt(21, 0, 0).expect("valid time")
            );
            assert_eq!(occurrences[0].key, rows[0].id.to_string());
        }
    }

    #[test_log::test]
    fn test_one_shot_with_unparseable_date_is_skipped() {
        let rows = vec![one_shot("next friday"), one_shot("31/02/2026")];
        assert!(expand_bookings(&rows, &RoomFilter::allow_all(), &window()).is_empty());
    }

    #[test_log::test]
    fn test_weekly_emits_every_matching_weekday() {
        let rows = vec![booking(RepeatKind::Week, Some("quarta-feira"))];
        let occurrences = expand_bookings(&rows, &RoomFilter::allow_all(), &window());

        // Wednesdays between 2026-01-01 and 2026-06-30: 4+4+4+5+4+4.
        assert_eq!(occurrences.len(), 25);
        for occurrence in &occurrences {
            assert_eq!(occurrence.start.date().weekday().num_days_from_sunday(), 3);
        }
    }

    #[test_log::test]
    fn test_portuguese_and_english_weekday_names_agree() {
        let a = booking(RepeatKind::Week, Some("quarta-feira"));
        let mut b = a.clone();
        b.repeat_day = Some("wed".to_string());

        let from_a = expand_bookings(
            std::slice::from_ref(&a),
            &RoomFilter::allow_all(),
            &window(),
        );
        let from_b = expand_bookings(
            std::slice::from_ref(&b),
            &RoomFilter::allow_all(),
            &window(),
        );
        assert_eq!(from_a, from_b);
        assert_eq!(from_a.len(), 25);
    }

    #[test_log::test]
    fn test_recurring_keys_carry_the_iso_date() {
        let rows = vec![booking(RepeatKind::Week, Some("sunday"))];
        let occurrences = expand_bookings(&rows, &RoomFilter::allow_all(), &window());

        let first = occurrences.first().expect("at least one Sunday");
        assert_eq!(first.key, format!("{}-2026-01-04", rows[0].id));
    }

    #[test_log::test]
    fn test_unresolvable_weekday_skips_only_that_booking() {
        let rows = vec![
            booking(RepeatKind::Week, Some("someday")),
            one_shot("10/01/2026"),
        ];
        let occurrences = expand_bookings(&rows, &RoomFilter::allow_all(), &window());

        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].booking_id, rows[1].id);
    }

    #[test_log::test]
    fn test_daily_emits_every_day_of_the_window() {
        let rows = vec![booking(RepeatKind::Day, None)];
        let occurrences = expand_bookings(&rows, &RoomFilter::allow_all(), &window());
        assert_eq!(occurrences.len(), 181);
    }

    #[test_log::test]
    fn test_monthly_emits_on_the_day_of_month() {
        let rows = vec![booking(RepeatKind::Month, Some("15"))];
        let occurrences = expand_bookings(&rows, &RoomFilter::allow_all(), &window());

        assert_eq!(occurrences.len(), 6);
        for occurrence in &occurrences {
            assert_eq!(occurrence.start.date().day(), 15);
        }
    }

    #[test_log::test]
    fn test_monthly_day_31_skips_short_months() {
        let rows = vec![booking(RepeatKind::Month, Some("31"))];
        let occurrences = expand_bookings(&rows, &RoomFilter::allow_all(), &window());

        // January, March, and May are the only 31-day months in the window.
        let days: Vec<NaiveDate> = occurrences.iter().map(|o| o.start.date()).collect();
        assert_eq!(
            days,
            vec![date(2026, 1, 31), date(2026, 3, 31), date(2026, 5, 31)]
        );
    }

    #[test_log::test]
    fn test_monthly_with_non_numeric_day_is_skipped() {
        let rows = vec![booking(RepeatKind::Month, Some("end of month"))];
        assert!(expand_bookings(&rows, &RoomFilter::allow_all(), &window()).is_empty());
    }

    #[test_log::test]
    fn test_booking_without_room_is_skipped() {
        let mut row = booking(RepeatKind::Week, Some("wed"));
        row.room_id = None;
        assert!(expand_bookings(&[row], &RoomFilter::allow_all(), &window()).is_empty());
    }

    #[test_log::test]
    fn test_booking_without_times_is_skipped() {
        let mut no_start = one_shot("10/01/2026");
        no_start.start_time = None;
        let mut bad_end = one_shot("10/01/2026");
        bad_end.end_time = Some("late".to_string());

        assert!(expand_bookings(&[no_start, bad_end], &RoomFilter::allow_all(), &window()).is_empty());
    }

    #[test_log::test]
    fn test_room_filter_excludes_before_expansion() {
        let allowed = booking(RepeatKind::Day, None);
        let excluded = booking(RepeatKind::Day, None);
        let filter: RoomFilter = [allowed.room_id.expect("fixture has a room")]
            .into_iter()
            .collect();

        let rows = vec![allowed, excluded];
        let occurrences = expand_bookings(&rows, &filter, &window());

        assert_eq!(occurrences.len(), 181);
        assert!(occurrences.iter().all(|o| o.booking_id == rows[0].id));
    }

    #[test_log::test]
    fn test_empty_filter_allows_every_room() {
        assert!(RoomFilter::allow_all().allows(Uuid::now_v7()));
    }

    #[test_log::test]
    fn test_expansion_is_deterministic() {
        let rows = vec![
            booking(RepeatKind::Week, Some("domingo")),
            booking(RepeatKind::Month, Some("1")),
            one_shot("05/04/2026"),
        ];
        let first = expand_bookings(&rows, &RoomFilter::allow_all(), &window());
        let second = expand_bookings(&rows, &RoomFilter::allow_all(), &window());
        assert_eq!(first, second);
    }
}
