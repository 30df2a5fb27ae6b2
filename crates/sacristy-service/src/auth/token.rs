//! JWT access tokens for the dashboard.
//!
//! Tokens are signed with HS256 using the configured `auth.secret` and carry
//! the user id, email, and role so the middleware can log a useful identity
//! without a database round trip. The user row is still re-read on every
//! request; deleted users lose access when their current token expires or
//! sooner.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use sacristy_db::db::enums::UserRole;
use sacristy_db::model::user::User;

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// ## Summary
/// Issues a signed access token for a user with the configured lifetime.
///
/// ## Errors
/// Returns an error if signing fails, which indicates a malformed secret.
pub fn issue_token(user: &User, secret: &str, ttl_minutes: i64) -> ServiceResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::InvalidConfiguration(format!("Failed to sign token: {e}")))
}

/// ## Summary
/// Verifies a token's signature and expiry and returns its claims.
///
/// Every verification failure (bad signature, expired, garbled token)
/// collapses into `NotAuthenticated`; the reason is traced, not surfaced.
///
/// ## Errors
/// Returns `NotAuthenticated` if the token is not acceptable.
pub fn verify_token(token: &str, secret: &str) -> ServiceResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        tracing::trace!("Token verification failed: {}", err);
        ServiceError::NotAuthenticated
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    const SECRET: &str = "unit-test-secret";

    fn test_user() -> User {
        User {
            id: Uuid::now_v7(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role: UserRole::Staff,
            password_hash: "unused".to_string(),
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let user = test_user();
        let token = issue_token(&user, SECRET, 60).expect("Failed to issue token");
        let claims = verify_token(&token, SECRET).expect("Failed to verify token");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Staff);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(&test_user(), SECRET, 60).expect("Failed to issue token");
        assert!(matches!(
            verify_token(&token, "some-other-secret"),
            Err(ServiceError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Default validation allows 60 seconds of leeway; expire well past it.
        let token = issue_token(&test_user(), SECRET, -10).expect("Failed to issue token");
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(ServiceError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(
            verify_token("not.a.token", SECRET),
            Err(ServiceError::NotAuthenticated)
        ));
    }
}
