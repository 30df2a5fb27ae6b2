use crate::auth::token::verify_token;
use crate::error::{ServiceError, ServiceResult};
use sacristy_core::config::Settings;
use sacristy_db::db::connection::DbConnection;
use sacristy_db::db::query;
use sacristy_db::model::user::User;

/// ## Summary
/// Resolves a bearer token into a fresh user row.
///
/// Verifies the token against the configured secret, then re-reads the user
/// from the database so role changes and deletions take effect immediately
/// rather than at token expiry.
///
/// ## Errors
/// Returns `NotAuthenticated` if the token is invalid or the user no longer
/// exists, or a database error if the lookup fails.
#[tracing::instrument(skip(token, conn, config))]
pub async fn authenticate(
    token: &str,
    conn: &mut DbConnection<'_>,
    config: &Settings,
) -> ServiceResult<User> {
    let claims = verify_token(token, &config.auth.secret)?;

    let user = query::user::find_by_id(conn, claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, "Token subject no longer exists");
            ServiceError::NotAuthenticated
        })?;

    tracing::debug!(user_email = %user.email, "User authenticated successfully");

    Ok(user)
}
