//! JSON REST surface, one module per resource.

mod analytics;
mod auth;
mod bookings;
mod calendar;
mod healthcheck;
mod members;
mod rooms;
mod scales;
mod users;

use salvo::Router;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMiddleware;
use sacristy_core::util::pagination::Pagination;
use sacristy_db::model::user::User;
use sacristy_service::error::ServiceError;

// Re-export route constants from core
pub use sacristy_core::constants::{API_ROUTE_COMPONENT, API_ROUTE_PREFIX};

/// Error body rendered for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Envelope for every paginated listing.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

pub(crate) fn bad_request(message: impl Into<String>) -> AppError {
    AppError::ServiceError(ServiceError::ValidationError(message.into()))
}

pub(crate) fn not_found(what: impl Into<String>) -> AppError {
    AppError::ServiceError(ServiceError::NotFound(what.into()))
}

pub(crate) fn conflict(message: impl Into<String>) -> AppError {
    AppError::ServiceError(ServiceError::Conflict(message.into()))
}

/// Parses a `<name>` path parameter as a UUID.
pub(crate) fn id_param(req: &salvo::Request, name: &str) -> AppResult<Uuid> {
    let raw = req
        .param::<String>(name)
        .ok_or_else(|| bad_request(format!("Missing {name} parameter")))?;
    Uuid::parse_str(&raw).map_err(|_| bad_request(format!("Invalid {name}: not a UUID")))
}

/// `page` / `page_size` query parameters, both optional.
pub(crate) fn page_params(req: &salvo::Request) -> (Option<i64>, Option<i64>) {
    (req.query::<i64>("page"), req.query::<i64>("page_size"))
}

/// Restricts a handler to admins. Returns the acting user.
pub(crate) fn require_admin(depot: &salvo::Depot) -> AppResult<&User> {
    let user = sacristy_service::auth::get_user_from_depot(depot)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(AppError::ServiceError(ServiceError::AuthorizationError(
            "Admin role required".to_string(),
        )))
    }
}

/// ## Summary
/// Constructs the main API router: the public endpoints (healthcheck,
/// register, login) plus everything else behind the auth middleware.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(healthcheck::routes())
        .push(auth::public_routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(auth::protected_routes())
                .push(users::routes())
                .push(rooms::routes())
                .push(bookings::routes())
                .push(calendar::routes())
                .push(members::routes())
                .push(scales::routes())
                .push(analytics::routes()),
        )
}
