//! Query composition for `booking` table operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::enums::RepeatKind;
use crate::db::schema::booking;
use crate::model::booking::{Booking, BookingChanges, NewBooking};

/// Returns a query for all bookings, most recently updated first.
#[must_use]
pub fn all() -> booking::BoxedQuery<'static, diesel::pg::Pg> {
    booking::table
        .order(booking::updated_at.desc())
        .into_boxed()
}

/// Returns a query for a booking by id.
#[must_use]
pub fn by_id(id: Uuid) -> booking::BoxedQuery<'static, diesel::pg::Pg> {
    booking::table.filter(booking::id.eq(id)).into_boxed()
}

/// Returns a query applying the list-endpoint filters: optional room and
/// optional repeat kind.
#[must_use]
pub fn filtered(
    room_id: Option<Uuid>,
    repeat: Option<RepeatKind>,
) -> booking::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = all();
    if let Some(room_id) = room_id {
        query = query.filter(booking::room_id.eq(room_id));
    }
    if let Some(repeat) = repeat {
        query = query.filter(booking::repeat.eq(repeat));
    }
    query
}

/// Counts bookings matching the list-endpoint filters.
///
/// ## Errors
/// Returns a database error if the count fails.
pub async fn count_filtered(
    conn: &mut DbConnection<'_>,
    room_id: Option<Uuid>,
    repeat: Option<RepeatKind>,
) -> QueryResult<i64> {
    filtered(room_id, repeat).count().get_result(conn).await
}

/// Loads one page of bookings matching the list-endpoint filters.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_page(
    conn: &mut DbConnection<'_>,
    room_id: Option<Uuid>,
    repeat: Option<RepeatKind>,
    limit: i64,
    offset: i64,
) -> QueryResult<Vec<Booking>> {
    filtered(room_id, repeat)
        .limit(limit)
        .offset(offset)
        .select(Booking::as_select())
        .load(conn)
        .await
}

/// Loads every booking. The calendar endpoint expands all templates on each
/// read, so this is unpaginated on purpose.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn load_all(conn: &mut DbConnection<'_>) -> QueryResult<Vec<Booking>> {
    all().select(Booking::as_select()).load(conn).await
}

/// Finds a booking by id, `None` if absent.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Booking>> {
    by_id(id)
        .select(Booking::as_select())
        .first(conn)
        .await
        .optional()
}

/// Inserts a booking and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_booking: &NewBooking<'_>,
) -> QueryResult<Booking> {
    diesel::insert_into(booking::table)
        .values(new_booking)
        .returning(Booking::as_select())
        .get_result(conn)
        .await
}

/// Applies a full-replace changeset to a booking and returns the updated row.
///
/// ## Errors
/// Returns `diesel::result::Error::NotFound` if the booking does not exist,
/// or any other database error.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &BookingChanges<'_>,
) -> QueryResult<Booking> {
    diesel::update(booking::table.filter(booking::id.eq(id)))
        .set(changes)
        .returning(Booking::as_select())
        .get_result(conn)
        .await
}

/// Deletes a booking row.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(booking::table.filter(booking::id.eq(id)))
        .execute(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of<Q>(query: &Q) -> String
    where
        Q: diesel::query_builder::QueryFragment<diesel::pg::Pg>,
    {
        diesel::debug_query::<diesel::pg::Pg, _>(query).to_string()
    }

    #[test_log::test]
    fn test_unfiltered_has_no_where_clause() {
        assert!(!sql_of(&filtered(None, None)).contains("WHERE"));
    }

    #[test_log::test]
    fn test_room_filter_is_present() {
        let sql = sql_of(&filtered(Some(Uuid::nil()), None));
        assert!(sql.contains("room_id"));
        assert!(!sql.contains("repeat\" ="));
    }

    #[test_log::test]
    fn test_repeat_filter_is_present() {
        let sql = sql_of(&filtered(None, Some(RepeatKind::Week)));
        assert!(sql.contains("repeat"));
    }

    #[test_log::test]
    fn test_both_filters_compose() {
        let sql = sql_of(&filtered(Some(Uuid::nil()), Some(RepeatKind::Month)));
        assert!(sql.contains("room_id"));
        assert!(sql.contains("repeat"));
    }
}
