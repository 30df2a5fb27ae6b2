//! Dashboard aggregates.

use salvo::writing::Json;
use salvo::{Depot, Router, handler};
use serde::Serialize;

use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use sacristy_db::db::query;

#[derive(Debug, Serialize)]
pub struct RoomUsage {
    pub room_id: String,
    pub room_name: String,
    pub bookings: i64,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub users: i64,
    pub rooms: i64,
    pub members: i64,
    pub bookings: i64,
    pub scales: i64,
    pub bookings_per_room: Vec<RoomUsage>,
}

/// ## Summary
/// GET /api/analytics/overview - Aggregate counts for the dashboard.
///
/// ## Errors
/// Returns HTTP 500/503 on database failure.
#[handler]
async fn overview_handler(depot: &mut Depot) -> AppResult<Json<OverviewResponse>> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let counts = query::analytics::overview_counts(&mut conn).await?;
    let per_room = query::analytics::bookings_per_room(&mut conn).await?;

    Ok(Json(OverviewResponse {
        users: counts.users,
        rooms: counts.rooms,
        members: counts.members,
        bookings: counts.bookings,
        scales: counts.scales,
        bookings_per_room: per_room
            .into_iter()
            .map(|usage| RoomUsage {
                room_id: usage.room_id.to_string(),
                room_name: usage.room_name,
                bookings: usage.bookings,
            })
            .collect(),
    }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("analytics").push(Router::with_path("overview").get(overview_handler))
}
