//! Church member registry CRUD.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};

use super::{PageResponse, bad_request, id_param, not_found, page_params};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use sacristy_core::util::pagination::Pagination;
use sacristy_db::db::query;
use sacristy_db::model::member::{Member, MemberChanges, NewMember};

#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Legacy textual form, stored verbatim.
    pub birth_date: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub member_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
}

impl MemberResponse {
    fn from_member(member: &Member) -> Self {
        Self {
            member_id: member.id.to_string(),
            name: member.name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            birth_date: member.birth_date.clone(),
            address: member.address.clone(),
        }
    }
}

fn validate(request: &MemberRequest) -> AppResult<()> {
    if request.name.trim().is_empty() {
        return Err(bad_request("Member name is required"));
    }
    Ok(())
}

/// ## Summary
/// POST /api/members - Register a member.
///
/// ## Errors
/// Returns HTTP 400 for a missing name.
#[handler]
async fn create_member_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let member_req: MemberRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&member_req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let new_member = NewMember {
        id: uuid::Uuid::now_v7(),
        name: member_req.name.trim(),
        email: member_req.email.as_deref(),
        phone: member_req.phone.as_deref(),
        birth_date: member_req.birth_date.as_deref(),
        address: member_req.address.as_deref(),
    };

    let member = query::member::insert(&mut conn, &new_member).await?;

    tracing::info!(member_id = %member.id, "Member created");

    res.status_code(StatusCode::CREATED);
    res.render(Json(MemberResponse::from_member(&member)));
    Ok(())
}

/// ## Summary
/// GET /api/members - Paginated listing with optional `search` on name.
///
/// ## Errors
/// Returns HTTP 500/503 on database failure.
#[handler]
async fn list_members_handler(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<PageResponse<MemberResponse>>> {
    let search = req.query::<String>("search");

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let (page, page_size) = page_params(req);
    let total = query::member::count_searched(&mut conn, search.as_deref()).await?;
    let pagination = Pagination::from_request(page, page_size, total);

    let members = query::member::list_page(
        &mut conn,
        search.as_deref(),
        pagination.limit,
        pagination.offset,
    )
    .await?;

    Ok(Json(PageResponse {
        items: members.iter().map(MemberResponse::from_member).collect(),
        pagination,
    }))
}

/// ## Summary
/// GET /api/members/<`member_id`> - Fetch one member.
///
/// ## Errors
/// Returns HTTP 404 for an unknown member.
#[handler]
async fn get_member_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MemberResponse>> {
    let member_id = id_param(req, "member_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let member = query::member::find_by_id(&mut conn, member_id)
        .await?
        .ok_or_else(|| not_found("Member not found"))?;

    Ok(Json(MemberResponse::from_member(&member)))
}

/// ## Summary
/// PUT /api/members/<`member_id`> - Replace a member's fields.
///
/// ## Errors
/// Returns HTTP 404 for an unknown member, HTTP 400 for a missing name.
#[handler]
async fn update_member_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MemberResponse>> {
    let member_id = id_param(req, "member_id")?;
    let member_req: MemberRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;
    validate(&member_req)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let changes = MemberChanges {
        name: member_req.name.trim(),
        email: member_req.email.as_deref(),
        phone: member_req.phone.as_deref(),
        birth_date: member_req.birth_date.as_deref(),
        address: member_req.address.as_deref(),
        updated_at: chrono::Utc::now(),
    };

    let member = query::member::update(&mut conn, member_id, &changes).await?;

    tracing::info!(member_id = %member.id, "Member updated");

    Ok(Json(MemberResponse::from_member(&member)))
}

/// ## Summary
/// DELETE /api/members/<`member_id`> - Remove a member and their scale
/// assignments.
///
/// ## Errors
/// Returns HTTP 404 for an unknown member.
#[handler]
async fn delete_member_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let member_id = id_param(req, "member_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let deleted = query::member::delete(&mut conn, member_id).await?;
    if deleted == 0 {
        return Err(not_found("Member not found"));
    }

    tracing::info!(member_id = %member_id, "Member deleted");

    res.status_code(StatusCode::NO_CONTENT);
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("members")
        .post(create_member_handler)
        .get(list_members_handler)
        .push(
            Router::with_path("<member_id>")
                .get(get_member_handler)
                .put(update_member_handler)
                .delete(delete_member_handler),
        )
}
