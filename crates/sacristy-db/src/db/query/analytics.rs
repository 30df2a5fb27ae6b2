//! Aggregate counts for the dashboard overview. Plain `COUNT(*)` and one
//! `GROUP BY`; anything fancier belongs elsewhere.

use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::{app_user, booking, member, room, scale};

/// Row counts across the five main tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewCounts {
    pub users: i64,
    pub rooms: i64,
    pub members: i64,
    pub bookings: i64,
    pub scales: i64,
}

/// Booking count per room, including rooms with zero bookings.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct RoomBookingCount {
    pub room_id: Uuid,
    pub room_name: String,
    pub bookings: i64,
}

/// Loads the dashboard overview counts.
///
/// ## Errors
/// Returns a database error if any count fails.
pub async fn overview_counts(conn: &mut DbConnection<'_>) -> QueryResult<OverviewCounts> {
    let users = app_user::table.count().get_result(conn).await?;
    let rooms = room::table.count().get_result(conn).await?;
    let members = member::table.count().get_result(conn).await?;
    let bookings = booking::table.count().get_result(conn).await?;
    let scales = scale::table.count().get_result(conn).await?;

    Ok(OverviewCounts {
        users,
        rooms,
        members,
        bookings,
        scales,
    })
}

/// Loads the booking count per room via a left join, so empty rooms still
/// show up with zero.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn bookings_per_room(conn: &mut DbConnection<'_>) -> QueryResult<Vec<RoomBookingCount>> {
    room::table
        .left_join(booking::table)
        .group_by((room::id, room::name))
        .order(room::name.asc())
        .select((room::id, room::name, count(booking::id.nullable())))
        .load(conn)
        .await
}
