//! Volunteer scale CRUD. A scale's assignment set is replaced wholesale on
//! every write, inside one transaction.

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
use sacristy_db::db::query;
use sacristy_db::model::scale::{NewScale, NewScaleAssignment, Scale, ScaleAssignment, ScaleChanges};

#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    pub member_id: Uuid,
    /// Duty label, e.g. "som" or "projecao".
    pub duty: String,
}

#[derive(Debug, Deserialize)]
pub struct ScaleRequest {
    pub description: String,
    /// Legacy textual form, stored verbatim.
    pub scale_date: Option<String>,
    pub start_time: Option<String>,
    pub room_id: Option<Uuid>,
    pub notes: Option<String>,
    #[serde(default)]
    pub assignments: Vec<AssignmentRequest>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub member_id: String,
    pub member_name: String,
    pub duty: String,
}

#[derive(Debug, Serialize)]
pub struct ScaleResponse {
    pub scale_id: String,
    pub description: String,
    pub scale_date: Option<String>,
    pub start_time: Option<String>,
    pub room_id: Option<String>,
    pub notes: Option<String>,
    pub user_id: String,
    pub assignments: Vec<AssignmentResponse>,
}

impl ScaleResponse {
    fn from_scale(scale: &Scale, assignments: &[(ScaleAssignment, String)]) -> Self {
        Self {
            scale_id: scale.id.to_string(),
            description: scale.description.clone(),
            scale_date: scale.scale_date.clone(),
            start_time: scale.start_time.clone(),
            room_id: scale.room_id.map(|id| id.to_string()),
            notes: scale.notes.clone(),
            user_id: scale.user_id.to_string(),
            assignments: assignments
                .iter()
                .map(|(assignment, member_name)| AssignmentResponse {
                    member_id: assignment.member_id.to_string(),
                    member_name: member_name.clone(),
                    duty: assignment.duty.clone(),
                })
                .collect(),
        }
    }
}

fn validate(request: &ScaleRequest) -> AppResult<()> {
    if request.description.trim().is_empty() {
        return Err(bad_request("Description is required"));
    }
    for assignment in &request.assignments {
        if assignment.duty.trim().is_empty() {
            return Err(bad_request("Every assignment needs a duty"));
        }
    }
    Ok(())
}

async fn ensure_references_exist(
    conn: &mut DbConnection<'_>,
    request: &ScaleRequest,
) -> AppResult<()> {
    if let Some(room_id) = request.room_id {
        query::room::find_by_id(conn, room_id)
            .await?
            .ok_or_else(|| bad_request("Unknown room"))?;
    }
    for assignment in &request.assignments {
        query::member::find_by_id(conn, assignment.member_id)
            .await?
            .ok_or_else(|| bad_request(format!("Unknown member: {}", assignment.member_id)))?;
    }
    Ok(())
}

fn new_assignments<'req>(
    scale_id: Uuid,
    request: &'req ScaleRequest,
) -> Vec<NewScaleAssignment<'req>> {
    request
        .assignments
        .iter()
        .map(|assignment| NewScaleAssignment {
            id: uuid::Uuid::now_v7(),
            scale_id,
            member_id: assignment.member_id,
            duty: assignment.duty.trim(),
        })
        .collect()
}

/// ## Summary
/// POST /api/scales - Create a scale with its assignments, atomically.
///
/// ## Errors
/// Returns HTTP 400 for invalid fields or unknown room/member references.
#[handler]
async fn create_scale_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let scale_req: ScaleRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&scale_req)?;

    let user_id = sacristy_service::auth::get_user_from_depot(depot)?.id;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    ensure_references_exist(&mut conn, &scale_req).await?;

    let scale_id = uuid::Uuid::now_v7();
    let new_scale = NewScale {
        id: scale_id,
        description: scale_req.description.trim(),
        scale_date: scale_req.scale_date.as_deref(),
        start_time: scale_req.start_time.as_deref(),
        room_id: scale_req.room_id,
        notes: scale_req.notes.as_deref(),
        user_id,
    };
    let assignments = new_assignments(scale_id, &scale_req);

    let scale = query::scale::insert_with_assignments(&mut conn, &new_scale, &assignments).await?;
    let stored_assignments = query::scale::load_assignments(&mut conn, scale.id).await?;

    tracing::info!(scale_id = %scale.id, assignments = stored_assignments.len(), "Scale created");

    res.status_code(StatusCode::CREATED);
    res.render(Json(ScaleResponse::from_scale(&scale, &stored_assignments)));
    Ok(())
}

/// ## Summary
/// GET /api/scales - Paginated scale listing, assignments included.
///
/// ## Errors
/// Returns HTTP 500/503 on database failure.
#[handler]
async fn list_scales_handler(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<PageResponse<ScaleResponse>>> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let (page, page_size) = page_params(req);
    let total = query::scale::count(&mut conn).await?;
    let pagination = Pagination::from_request(page, page_size, total);

    let scales = query::scale::list_page(&mut conn, pagination.limit, pagination.offset).await?;

    let mut items = Vec::with_capacity(scales.len());
    for scale in &scales {
        let assignments = query::scale::load_assignments(&mut conn, scale.id).await?;
        items.push(ScaleResponse::from_scale(scale, &assignments));
    }

    Ok(Json(PageResponse { items, pagination }))
}

/// ## Summary
/// GET /api/scales/<`scale_id`> - Fetch one scale with member names
/// resolved.
///
/// ## Errors
/// Returns HTTP 404 for an unknown scale.
#[handler]
async fn get_scale_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<ScaleResponse>> {
    let scale_id = id_param(req, "scale_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let scale = query::scale::find_by_id(&mut conn, scale_id)
        .await?
        .ok_or_else(|| not_found("Scale not found"))?;
    let assignments = query::scale::load_assignments(&mut conn, scale.id).await?;

    Ok(Json(ScaleResponse::from_scale(&scale, &assignments)))
}

/// ## Summary
/// PUT /api/scales/<`scale_id`> - Replace a scale's fields and swap its
/// assignment set, atomically.
///
/// ## Errors
/// Returns HTTP 404 for an unknown scale, HTTP 400 for invalid fields or
/// unknown references.
#[handler]
async fn update_scale_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<ScaleResponse>> {
    let scale_id = id_param(req, "scale_id")?;
    let scale_req: ScaleRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&scale_req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    ensure_references_exist(&mut conn, &scale_req).await?;

    let changes = ScaleChanges {
        description: scale_req.description.trim(),
        scale_date: scale_req.scale_date.as_deref(),
        start_time: scale_req.start_time.as_deref(),
        room_id: scale_req.room_id,
        notes: scale_req.notes.as_deref(),
        updated_at: chrono::Utc::now(),
    };
    let assignments = new_assignments(scale_id, &scale_req);

    let scale =
        query::scale::update_with_assignments(&mut conn, scale_id, &changes, &assignments).await?;
    let stored_assignments = query::scale::load_assignments(&mut conn, scale.id).await?;

    tracing::info!(scale_id = %scale.id, "Scale updated");

    Ok(Json(ScaleResponse::from_scale(&scale, &stored_assignments)))
}

/// ## Summary
/// DELETE /api/scales/<`scale_id`> - Remove a scale; its assignments
/// cascade.
///
/// ## Errors
/// Returns HTTP 404 for an unknown scale.
#[handler]
async fn delete_scale_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let scale_id = id_param(req, "scale_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let deleted = query::scale::delete(&mut conn, scale_id).await?;
    if deleted == 0 {
        return Err(not_found("Scale not found"));
    }

    tracing::info!(scale_id = %scale_id, "Scale deleted");

    res.status_code(StatusCode::NO_CONTENT);
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("scales")
        .post(create_scale_handler)
        .get(list_scales_handler)
        .push(
            Router::with_path("<scale_id>")
                .get(get_scale_handler)
                .put(update_scale_handler)
                .delete(delete_scale_handler),
        )
}
