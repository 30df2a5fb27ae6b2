//! Helpers for passing the authenticated user between the middleware and
//! the handlers through the Salvo depot.

use crate::error::{ServiceError, ServiceResult};
use sacristy_db::model::user::User;

/// Depot keys shared between middleware and handlers.
pub mod depot_keys {
    pub const AUTHENTICATED_USER: &str = "authenticated_user";
}

/// The authenticated user as stored in the depot. Every protected route
/// requires one; there is no anonymous mode.
#[derive(Debug, Clone)]
pub struct DepotUser(pub User);

/// Get the authenticated user from the depot.
///
/// ## Errors
/// Returns `NotAuthenticated` if the middleware did not store a user.
pub fn get_user_from_depot(depot: &salvo::Depot) -> ServiceResult<&User> {
    depot
        .get::<DepotUser>(depot_keys::AUTHENTICATED_USER)
        .map(|wrapper| &wrapper.0)
        .map_err(|_| ServiceError::NotAuthenticated)
}
