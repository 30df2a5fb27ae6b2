//! Registration, login, and the current-user endpoint.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};

use super::users::UserResponse;
use super::bad_request;
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use sacristy_db::db::enums::UserRole;
use sacristy_db::db::query;
use sacristy_db::model::user::NewUser;
use sacristy_service::auth::{get_user_from_depot, issue_token, password};
use sacristy_service::error::ServiceError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// ## Summary
/// POST /api/auth/register - Register a new user with email and password.
///
/// The very first registered user becomes the admin; everyone after that
/// starts as staff.
///
/// ## Errors
/// Returns HTTP 400 if a field is empty or the email is already registered,
/// HTTP 500/503 on database failure.
#[handler]
async fn register_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    tracing::debug!("Processing user registration request");

    let register_req: RegisterRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;

    if register_req.email.is_empty() || register_req.name.is_empty() || register_req.password.is_empty() {
        return Err(bad_request("Email, name, and password are required"));
    }

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    if query::user::find_by_email(&mut conn, &register_req.email)
        .await?
        .is_some()
    {
        return Err(bad_request("Email already registered"));
    }

    let password_hash = password::hash_password(&register_req.password)?;

    // First user in an empty installation gets the admin role.
    let role = if query::user::count(&mut conn).await? == 0 {
        UserRole::Admin
    } else {
        UserRole::Staff
    };

    let new_user = NewUser {
        id: uuid::Uuid::now_v7(),
        name: &register_req.name,
        email: &register_req.email,
        role,
        password_hash: &password_hash,
    };

    let user = query::user::insert(&mut conn, &new_user).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered successfully");

    res.status_code(StatusCode::CREATED);
    res.render(Json(UserResponse::from_user(&user)));
    Ok(())
}

/// ## Summary
/// POST /api/auth/login - Verify credentials and issue an access token.
///
/// ## Errors
/// Returns HTTP 401 if the email is unknown or the password does not match,
/// HTTP 500/503 on database failure.
#[handler]
async fn login_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<LoginResponse>> {
    tracing::debug!("Processing login request");

    let login_req: LoginRequest = req
        .parse_json()
        .await
        .map_err(|_| bad_request("Invalid request body"))?;

    if login_req.email.is_empty() || login_req.password.is_empty() {
        return Err(bad_request("Email and password are required"));
    }

    let config = get_config_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    // Unknown email and wrong password are indistinguishable on the wire.
    let user = query::user::find_by_email(&mut conn, &login_req.email)
        .await?
        .ok_or(ServiceError::NotAuthenticated)?;

    password::verify_password(&login_req.password, &user.password_hash)?;

    let token = issue_token(&user, &config.auth.secret, config.auth.token_ttl_minutes)?;

    tracing::info!(user_id = %user.id, email = %user.email, "User logged in successfully");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from_user(&user),
    }))
}

/// ## Summary
/// GET /api/auth/me - Returns the authenticated user.
///
/// ## Errors
/// Returns HTTP 401 if no user was stored by the auth middleware.
#[handler]
async fn me_handler(depot: &mut Depot) -> AppResult<Json<UserResponse>> {
    let user = get_user_from_depot(depot)?;
    Ok(Json(UserResponse::from_user(user)))
}

#[must_use]
pub fn public_routes() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(register_handler))
        .push(Router::with_path("login").post(login_handler))
}

#[must_use]
pub fn protected_routes() -> Router {
    Router::with_path("auth").push(Router::with_path("me").get(me_handler))
}
