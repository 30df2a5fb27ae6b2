//! Query composition per table: boxed filter builders plus async execution
//! functions taking a pooled connection.

pub mod analytics;
pub mod booking;
pub mod member;
pub mod room;
pub mod scale;
pub mod user;
