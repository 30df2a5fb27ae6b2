//! Authentication flow.
//!
//! ## Module Organization
//!
//! - `authenticate`: token string to verified database user
//! - `depot`: helpers for stashing and retrieving the authenticated user
//! - `password`: password hashing and verification with Argon2
//! - `token`: JWT claims, issue and verify

pub mod authenticate;
pub mod depot;
pub mod password;
pub mod token;

pub use authenticate::authenticate;
pub use depot::{DepotUser, depot_keys, get_user_from_depot};
pub use token::{Claims, issue_token, verify_token};
