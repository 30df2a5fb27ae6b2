//! The calendar read model: every booking template expanded into concrete
//! occurrences for the next six months.

use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Serialize;
use uuid::Uuid;

use super::bad_request;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use sacristy_db::db::query;
use sacristy_service::schedule::{ExpansionWindow, Occurrence, RoomFilter, expand_bookings};

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    /// Window start (inclusive) and end (exclusive) as ISO dates.
    pub window_start: String,
    pub window_end: String,
    pub occurrences: Vec<Occurrence>,
}

/// Parses the optional `rooms=<id,id,...>` query parameter. Absent or empty
/// means every room.
fn room_filter(req: &Request) -> AppResult<RoomFilter> {
    let Some(raw) = req.query::<String>("rooms") else {
        return Ok(RoomFilter::allow_all());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Uuid::parse_str(part).map_err(|_| bad_request(format!("Invalid room id: {part}"))))
        .collect::<AppResult<RoomFilter>>()
}

/// ## Summary
/// GET /api/calendar/occurrences - Expand all bookings into the occurrence
/// list for the window starting today, optionally restricted to a set of
/// rooms.
///
/// The occurrence list is derived, never persisted: the same rows and the
/// same day produce the same list.
///
/// ## Errors
/// Returns HTTP 400 for a malformed room id, HTTP 500/503 on database
/// failure.
#[handler]
async fn occurrences_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<CalendarResponse>> {
    let filter = room_filter(req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let bookings = query::booking::load_all(&mut conn).await?;

    let window = ExpansionWindow::from_today();
    let occurrences = expand_bookings(&bookings, &filter, &window);

    tracing::debug!(
        bookings = bookings.len(),
        occurrences = occurrences.len(),
        "Calendar expanded"
    );

    Ok(Json(CalendarResponse {
        window_start: window.start().to_string(),
        window_end: window.end().to_string(),
        occurrences,
    }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("calendar").push(Router::with_path("occurrences").get(occurrences_handler))
}
