use salvo::Depot;
use salvo::http::StatusCode;
use salvo::http::header::AUTHORIZATION;
use salvo::writing::Json;
use tracing::error;

use crate::app::api::ErrorResponse;
use crate::{config::get_config_from_depot, db_handler::get_db_from_depot};
use sacristy_service::auth::{DepotUser, authenticate, depot_keys};

/// ## Summary
/// Middleware handler for authentication.
/// Use this as a hoop on routes that require a logged-in user.
pub struct AuthMiddleware;

fn reject(res: &mut salvo::Response, ctrl: &mut salvo::FlowCtrl, status: StatusCode, msg: &str) {
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: msg.to_string(),
    }));
    ctrl.skip_rest();
}

/// Pulls the token out of `Authorization: Bearer <token>`.
fn bearer_token(req: &salvo::Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// ## Summary
/// Authentication middleware that resolves the bearer token into a user and
/// stores it in the depot. Requests without a usable token are rejected with
/// 401 before any database connection is borrowed.
///
/// ## Side Effects
/// Inserts the authenticated user into the depot for downstream handlers.
///
/// ## Errors
/// Renders 401 for missing/invalid tokens, 503 when no database connection
/// is available, and 500 for depot wiring failures.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let Some(token) = bearer_token(req) else {
            reject(
                res,
                ctrl,
                StatusCode::UNAUTHORIZED,
                "Authentication required",
            );
            return;
        };

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                reject(
                    res,
                    ctrl,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
                return;
            }
        };

        let provider = match get_db_from_depot(depot) {
            Ok(p) => p,
            Err(e) => {
                error!(error = ?e, "Failed to get database provider from depot");
                reject(
                    res,
                    ctrl,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
                return;
            }
        };

        let mut conn = match provider.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!(error = ?e, "Failed to get database connection");
                reject(
                    res,
                    ctrl,
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database unavailable",
                );
                return;
            }
        };

        match authenticate(token, &mut conn, &config).await {
            Ok(user) => {
                depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser(user));
            }
            Err(service_err) => {
                use sacristy_service::error::ServiceError;

                if matches!(service_err, ServiceError::NotAuthenticated) {
                    reject(
                        res,
                        ctrl,
                        StatusCode::UNAUTHORIZED,
                        "Invalid or expired token",
                    );
                    return;
                }

                error!(error = ?service_err, "Authentication failed with error");
                reject(
                    res,
                    ctrl,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        }
    }
}
