//! Query composition for `room` table operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::{booking, room};
use crate::model::room::{NewRoom, Room, RoomChanges};

/// Returns a query for all rooms, ordered by name.
#[must_use]
pub fn all() -> room::BoxedQuery<'static, diesel::pg::Pg> {
    room::table.order(room::name.asc()).into_boxed()
}

/// Returns a query for a room by id.
#[must_use]
pub fn by_id(id: Uuid) -> room::BoxedQuery<'static, diesel::pg::Pg> {
    room::table.filter(room::id.eq(id)).into_boxed()
}

/// Counts all rooms.
///
/// ## Errors
/// Returns a database error if the count fails.
pub async fn count(conn: &mut DbConnection<'_>) -> QueryResult<i64> {
    room::table.count().get_result(conn).await
}

/// Loads one page of rooms.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_page(
    conn: &mut DbConnection<'_>,
    limit: i64,
    offset: i64,
) -> QueryResult<Vec<Room>> {
    all()
        .limit(limit)
        .offset(offset)
        .select(Room::as_select())
        .load(conn)
        .await
}

/// Finds a room by id, `None` if absent.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Room>> {
    by_id(id)
        .select(Room::as_select())
        .first(conn)
        .await
        .optional()
}

/// Counts bookings that reference a room. Used to refuse deleting a room
/// that still has bookings.
///
/// ## Errors
/// Returns a database error if the count fails.
pub async fn booking_count(conn: &mut DbConnection<'_>, room_id: Uuid) -> QueryResult<i64> {
    booking::table
        .filter(booking::room_id.eq(room_id))
        .count()
        .get_result(conn)
        .await
}

/// Inserts a room and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails, including unique-name
/// violations.
pub async fn insert(conn: &mut DbConnection<'_>, new_room: &NewRoom<'_>) -> QueryResult<Room> {
    diesel::insert_into(room::table)
        .values(new_room)
        .returning(Room::as_select())
        .get_result(conn)
        .await
}

/// Applies a full-replace changeset to a room and returns the updated row.
///
/// ## Errors
/// Returns `diesel::result::Error::NotFound` if the room does not exist, or
/// any other database error.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &RoomChanges<'_>,
) -> QueryResult<Room> {
    diesel::update(room::table.filter(room::id.eq(id)))
        .set(changes)
        .returning(Room::as_select())
        .get_result(conn)
        .await
}

/// Deletes a room row.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(room::table.filter(room::id.eq(id)))
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

    #[test]
    fn test_all_orders_by_name() {
        assert!(sql_of(&all()).contains("ORDER BY"));
    }

    #[test]
    fn test_by_id_filters_on_id() {
        let sql = sql_of(&by_id(Uuid::nil()));
        assert!(sql.contains("WHERE"));
        assert!(sql.contains("id"));
    }
}
