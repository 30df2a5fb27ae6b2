//! Booking CRUD over the stored templates.
//!
//! Create and update validate what a human just typed; the stored textual
//! date/time forms are kept verbatim so rows remain byte-identical to what
//! the legacy importer wrote. Rows that predate validation may still be
//! malformed, which the expander tolerates.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PageResponse, bad_request, id_param, not_found, page_params};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use sacristy_core::util::pagination::Pagination;
use sacristy_db::db::connection::DbConnection;
use sacristy_db::db::enums::RepeatKind;
use sacristy_db::db::query;
use sacristy_db::model::booking::{Booking, BookingChanges, NewBooking};
use sacristy_service::schedule::{dates, weekday};

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub description: String,
    pub room_id: Option<Uuid>,
    pub booking_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub repeat: RepeatKind,
    pub repeat_day: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking_id: String,
    pub description: String,
    pub room_id: Option<String>,
    pub booking_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub repeat: RepeatKind,
    pub repeat_day: Option<String>,
    pub user_id: String,
}

impl BookingResponse {
    fn from_booking(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id.to_string(),
            description: booking.description.clone(),
            room_id: booking.room_id.map(|id| id.to_string()),
            booking_date: booking.booking_date.clone(),
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            repeat: booking.repeat,
            repeat_day: booking.repeat_day.clone(),
            user_id: booking.user_id.to_string(),
        }
    }
}

/// Rejects requests the expander would silently drop. Existing legacy rows
/// bypass this; it guards new input only.
fn validate(request: &BookingRequest) -> AppResult<()> {
    if request.description.trim().is_empty() {
        return Err(bad_request("Description is required"));
    }

    let start = request
        .start_time
        .as_deref()
        .ok_or_else(|| bad_request("Start time is required"))?;
    if dates::parse_legacy_time(start).is_none() {
        return Err(bad_request("Start time must be HH:MM or HH:MM:SS"));
    }

    let end = request
        .end_time
        .as_deref()
        .ok_or_else(|| bad_request("End time is required"))?;
    if dates::parse_legacy_time(end).is_none() {
        return Err(bad_request("End time must be HH:MM or HH:MM:SS"));
    }

    match request.repeat {
        RepeatKind::None => {
            let date = request
                .booking_date
                .as_deref()
                .ok_or_else(|| bad_request("A one-time booking needs a date"))?;
            if dates::parse_legacy_date(date).is_none() {
                return Err(bad_request("Date must be DD/MM/YYYY or YYYY-MM-DD"));
            }
        }
        RepeatKind::Day => {}
        RepeatKind::Week => {
            let day = request
                .repeat_day
                .as_deref()
                .ok_or_else(|| bad_request("A weekly booking needs a weekday"))?;
            if weekday::weekday_index(day).is_none() {
                return Err(bad_request(format!("Unknown weekday: {day}")));
            }
        }
        RepeatKind::Month => {
            let valid = request
                .repeat_day
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .is_some_and(|day| (1..=31).contains(&day));
            if !valid {
                return Err(bad_request("A monthly booking needs a day of month (1-31)"));
            }
        }
    }

    Ok(())
}

async fn ensure_room_exists(conn: &mut DbConnection<'_>, room_id: Option<Uuid>) -> AppResult<()> {
    if let Some(room_id) = room_id {
        query::room::find_by_id(conn, room_id)
            .await?
            .ok_or_else(|| bad_request("Unknown room"))?;
    }
    Ok(())
}

fn repeat_query_param(req: &Request) -> AppResult<Option<RepeatKind>> {
    match req.query::<String>("repeat") {
        Some(raw) => raw
            .parse::<RepeatKind>()
            .map(Some)
            .map_err(|_| bad_request(format!("Unknown repeat kind: {raw}"))),
        None => Ok(None),
    }
}

/// ## Summary
/// POST /api/bookings - Create a booking owned by the acting user.
///
/// ## Errors
/// Returns HTTP 400 for invalid fields or an unknown room.
#[handler]
async fn create_booking_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let booking_req: BookingRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&booking_req)?;

    let user_id = sacristy_service::auth::get_user_from_depot(depot)?.id;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    ensure_room_exists(&mut conn, booking_req.room_id).await?;

    let new_booking = NewBooking {
        id: uuid::Uuid::now_v7(),
        description: booking_req.description.trim(),
        room_id: booking_req.room_id,
        booking_date: booking_req.booking_date.as_deref(),
        start_time: booking_req.start_time.as_deref(),
        end_time: booking_req.end_time.as_deref(),
        repeat: booking_req.repeat,
        repeat_day: booking_req.repeat_day.as_deref(),
        user_id,
    };

    let booking = query::booking::insert(&mut conn, &new_booking).await?;

    tracing::info!(booking_id = %booking.id, repeat = %booking.repeat, "Booking created");

    res.status_code(StatusCode::CREATED);
    res.render(Json(BookingResponse::from_booking(&booking)));
    Ok(())
}

/// ## Summary
/// GET /api/bookings - Paginated listing, filterable by `room_id` and
/// `repeat` query parameters.
///
/// ## Errors
/// Returns HTTP 400 for an unknown repeat kind, HTTP 500/503 on database
/// failure.
#[handler]
async fn list_bookings_handler(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<PageResponse<BookingResponse>>> {
    let room_id = req.query::<Uuid>("room_id");
    let repeat = repeat_query_param(req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let (page, page_size) = page_params(req);
    let total = query::booking::count_filtered(&mut conn, room_id, repeat).await?;
    let pagination = Pagination::from_request(page, page_size, total);

    let bookings = query::booking::list_page(
        &mut conn,
        room_id,
        repeat,
        pagination.limit,
        pagination.offset,
    )
    .await?;

    Ok(Json(PageResponse {
        items: bookings.iter().map(BookingResponse::from_booking).collect(),
        pagination,
    }))
}

/// ## Summary
/// GET /api/bookings/<`booking_id`> - Fetch one booking.
///
/// ## Errors
/// Returns HTTP 404 for an unknown booking.
#[handler]
async fn get_booking_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<BookingResponse>> {
    let booking_id = id_param(req, "booking_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let booking = query::booking::find_by_id(&mut conn, booking_id)
        .await?
        .ok_or_else(|| not_found("Booking not found"))?;

    Ok(Json(BookingResponse::from_booking(&booking)))
}

/// ## Summary
/// PUT /api/bookings/<`booking_id`> - Replace a booking's fields.
///
/// ## Errors
/// Returns HTTP 404 for an unknown booking, HTTP 400 for invalid fields or
/// an unknown room.
#[handler]
async fn update_booking_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<BookingResponse>> {
    let booking_id = id_param(req, "booking_id")?;
    let booking_req: BookingRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&booking_req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    ensure_room_exists(&mut conn, booking_req.room_id).await?;

    let changes = BookingChanges {
        description: booking_req.description.trim(),
        room_id: booking_req.room_id,
        booking_date: booking_req.booking_date.as_deref(),
        start_time: booking_req.start_time.as_deref(),
        end_time: booking_req.end_time.as_deref(),
        repeat: booking_req.repeat,
        repeat_day: booking_req.repeat_day.as_deref(),
        updated_at: chrono::Utc::now(),
    };

    let booking = query::booking::update(&mut conn, booking_id, &changes).await?;

    tracing::info!(booking_id = %booking.id, "Booking updated");

    Ok(Json(BookingResponse::from_booking(&booking)))
}

/// ## Summary
/// DELETE /api/bookings/<`booking_id`> - Remove a booking.
///
/// ## Errors
/// Returns HTTP 404 for an unknown booking.
#[handler]
async fn delete_booking_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let booking_id = id_param(req, "booking_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let deleted = query::booking::delete(&mut conn, booking_id).await?;
    if deleted == 0 {
        return Err(not_found("Booking not found"));
    }

    tracing::info!(booking_id = %booking_id, "Booking deleted");

    res.status_code(StatusCode::NO_CONTENT);
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("bookings")
        .post(create_booking_handler)
        .get(list_bookings_handler)
        .push(
            Router::with_path("<booking_id>")
                .get(get_booking_handler)
                .put(update_booking_handler)
                .delete(delete_booking_handler),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(repeat: RepeatKind, repeat_day: Option<&str>) -> BookingRequest {
        BookingRequest {
            description: "Culto de oração".to_string(),
            room_id: None,
            booking_date: Some("12/10/2026".to_string()),
            start_time: Some("19:30".to_string()),
            end_time: Some("21:00".to_string()),
            repeat,
            repeat_day: repeat_day.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_requests_pass() {
        assert!(validate(&request(RepeatKind::None, None)).is_ok());
        assert!(validate(&request(RepeatKind::Day, None)).is_ok());
        assert!(validate(&request(RepeatKind::Week, Some("quarta-feira"))).is_ok());
        assert!(validate(&request(RepeatKind::Month, Some("15"))).is_ok());
    }

    #[test]
    fn test_blank_description_is_rejected() {
        let mut req = request(RepeatKind::None, None);
        req.description = "   ".to_string();
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_missing_or_malformed_times_are_rejected() {
        let mut req = request(RepeatKind::Day, None);
        req.start_time = None;
        assert!(validate(&req).is_err());

        let mut req = request(RepeatKind::Day, None);
        req.end_time = Some("nineish".to_string());
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_one_time_booking_needs_a_parseable_date() {
        let mut req = request(RepeatKind::None, None);
        req.booking_date = None;
        assert!(validate(&req).is_err());

        let mut req = request(RepeatKind::None, None);
        req.booking_date = Some("31/02/2026".to_string());
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_weekly_booking_needs_a_known_weekday() {
        assert!(validate(&request(RepeatKind::Week, Some("someday"))).is_err());
        assert!(validate(&request(RepeatKind::Week, None)).is_err());
    }

    #[test]
    fn test_monthly_booking_needs_a_day_in_range() {
        assert!(validate(&request(RepeatKind::Month, Some("0"))).is_err());
        assert!(validate(&request(RepeatKind::Month, Some("32"))).is_err());
        assert!(validate(&request(RepeatKind::Month, Some("fifth"))).is_err());
    }
}
