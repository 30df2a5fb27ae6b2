//! User administration. Everything here requires the admin role except
//! changing your own password.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};

use super::{PageResponse, bad_request, id_param, not_found, page_params, require_admin};
use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};
use sacristy_core::util::pagination::Pagination;
use sacristy_db::db::query;
use sacristy_db::model::user::User;
use sacristy_service::auth::{get_user_from_depot, password};
use sacristy_service::error::ServiceError;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl UserResponse {
    pub(crate) fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// ## Summary
/// GET /api/users - Paginated user listing, admin only.
///
/// ## Errors
/// Returns HTTP 403 for non-admins, HTTP 500/503 on database failure.
#[handler]
async fn list_users_handler(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<PageResponse<UserResponse>>> {
    require_admin(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let (page, page_size) = page_params(req);
    let total = query::user::count(&mut conn).await?;
    let pagination = Pagination::from_request(page, page_size, total);

    let users = query::user::list_page(&mut conn, pagination.limit, pagination.offset).await?;

    Ok(Json(PageResponse {
        items: users.iter().map(UserResponse::from_user).collect(),
        pagination,
    }))
}

/// ## Summary
/// PUT /api/users/<`user_id`>/password - Replace a user's password.
///
/// Admins may change anyone's password; staff only their own.
///
/// ## Errors
/// Returns HTTP 403 when staff target another user, HTTP 404 for an unknown
/// user, HTTP 400 for an empty password.
#[handler]
async fn update_password_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<UserResponse>> {
    let acting_user = get_user_from_depot(depot)?;
    let target_id = id_param(req, "user_id")?;

    if !acting_user.is_admin() && acting_user.id != target_id {
        return Err(AppError::ServiceError(ServiceError::AuthorizationError(
            "Cannot change another user's password".to_string(),
        )));
    }

    let update_req: UpdatePasswordRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;

    if update_req.password.is_empty() {
        return Err(bad_request("Password is required"));
    }

    let acting_email = acting_user.email.clone();
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let target_user = query::user::find_by_id(&mut conn, target_id)
        .await?
        .ok_or_else(|| not_found("User not found"))?;

    let password_hash = password::hash_password(&update_req.password)?;
    query::user::update_password_hash(&mut conn, target_id, &password_hash).await?;

    tracing::info!(
        target_user_id = %target_id,
        updated_by = %acting_email,
        "Password updated successfully"
    );

    Ok(Json(UserResponse::from_user(&target_user)))
}

/// ## Summary
/// DELETE /api/users/<`user_id`> - Remove a user, admin only.
///
/// Admins cannot delete themselves; that would lock the installation.
///
/// ## Errors
/// Returns HTTP 403 for non-admins or self-deletion, HTTP 404 for an
/// unknown user, HTTP 409 when the user still owns bookings or scales.
#[handler]
async fn delete_user_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let acting_user = require_admin(depot)?;
    let target_id = id_param(req, "user_id")?;

    if acting_user.id == target_id {
        return Err(AppError::ServiceError(ServiceError::AuthorizationError(
            "Cannot delete your own account".to_string(),
        )));
    }

    let acting_email = acting_user.email.clone();
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let deleted = query::user::delete(&mut conn, target_id).await?;
    if deleted == 0 {
        return Err(not_found("User not found"));
    }

    tracing::info!(target_user_id = %target_id, deleted_by = %acting_email, "User deleted");

    res.status_code(StatusCode::NO_CONTENT);
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("users")
        .get(list_users_handler)
        .push(Router::with_path("<user_id>/password").put(update_password_handler))
        .push(Router::with_path("<user_id>").delete(delete_user_handler))
}
