//! Room CRUD.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};

use super::{PageResponse, bad_request, conflict, id_param, not_found, page_params};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use sacristy_core::util::pagination::Pagination;
use sacristy_db::db::query;
use sacristy_db::model::room::{NewRoom, Room, RoomChanges};

#[derive(Debug, Deserialize)]
pub struct RoomRequest {
    pub name: String,
    pub capacity: Option<i32>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub room_id: String,
    pub name: String,
    pub capacity: Option<i32>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

impl RoomResponse {
    fn from_room(room: &Room) -> Self {
        Self {
            room_id: room.id.to_string(),
            name: room.name.clone(),
            capacity: room.capacity,
            color: room.color.clone(),
            notes: room.notes.clone(),
        }
    }
}

fn validate(request: &RoomRequest) -> AppResult<()> {
    if request.name.trim().is_empty() {
        return Err(bad_request("Room name is required"));
    }
    if matches!(request.capacity, Some(capacity) if capacity < 0) {
        return Err(bad_request("Capacity cannot be negative"));
    }
    Ok(())
}

/// ## Summary
/// POST /api/rooms - Create a room.
///
/// ## Errors
/// Returns HTTP 400 for a missing name, a negative capacity, or a duplicate
/// room name.
#[handler]
async fn create_room_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let room_req: RoomRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&room_req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let new_room = NewRoom {
        id: uuid::Uuid::now_v7(),
        name: room_req.name.trim(),
        capacity: room_req.capacity,
        color: room_req.color.as_deref(),
        notes: room_req.notes.as_deref(),
    };

    let room = query::room::insert(&mut conn, &new_room).await?;

    tracing::info!(room_id = %room.id, name = %room.name, "Room created");

    res.status_code(StatusCode::CREATED);
    res.render(Json(RoomResponse::from_room(&room)));
    Ok(())
}

/// ## Summary
/// GET /api/rooms - Paginated room listing.
///
/// ## Errors
/// Returns HTTP 500/503 on database failure.
#[handler]
async fn list_rooms_handler(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<PageResponse<RoomResponse>>> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let (page, page_size) = page_params(req);
    let total = query::room::count(&mut conn).await?;
    let pagination = Pagination::from_request(page, page_size, total);

    let rooms = query::room::list_page(&mut conn, pagination.limit, pagination.offset).await?;

    Ok(Json(PageResponse {
        items: rooms.iter().map(RoomResponse::from_room).collect(),
        pagination,
    }))
}

/// ## Summary
/// GET /api/rooms/<`room_id`> - Fetch one room.
///
/// ## Errors
/// Returns HTTP 404 for an unknown room.
#[handler]
async fn get_room_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<RoomResponse>> {
    let room_id = id_param(req, "room_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let room = query::room::find_by_id(&mut conn, room_id)
        .await?
        .ok_or_else(|| not_found("Room not found"))?;

    Ok(Json(RoomResponse::from_room(&room)))
}

/// ## Summary
/// PUT /api/rooms/<`room_id`> - Replace a room's fields.
///
/// ## Errors
/// Returns HTTP 404 for an unknown room, HTTP 400 for invalid fields.
#[handler]
async fn update_room_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<RoomResponse>> {
    let room_id = id_param(req, "room_id")?;
    let room_req: RoomRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&room_req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let changes = RoomChanges {
        name: room_req.name.trim(),
        capacity: room_req.capacity,
        color: room_req.color.as_deref(),
        notes: room_req.notes.as_deref(),
        updated_at: chrono::Utc::now(),
    };

    let room = query::room::update(&mut conn, room_id, &changes).await?;

    tracing::info!(room_id = %room.id, "Room updated");

    Ok(Json(RoomResponse::from_room(&room)))
}

/// ## Summary
/// DELETE /api/rooms/<`room_id`> - Remove a room.
///
/// ## Errors
/// Returns HTTP 409 while bookings still reference the room, HTTP 404 for
/// an unknown room.
#[handler]
async fn delete_room_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let room_id = id_param(req, "room_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    if query::room::booking_count(&mut conn, room_id).await? > 0 {
        return Err(conflict("Room still has bookings"));
    }

    let deleted = query::room::delete(&mut conn, room_id).await?;
    if deleted == 0 {
        return Err(not_found("Room not found"));
    }

    tracing::info!(room_id = %room_id, "Room deleted");

    res.status_code(StatusCode::NO_CONTENT);
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("rooms")
        .post(create_room_handler)
        .get(list_rooms_handler)
        .push(
            Router::with_path("<room_id>")
                .get(get_room_handler)
                .put(update_room_handler)
                .delete(delete_room_handler),
        )
}
