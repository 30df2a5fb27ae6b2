pub mod booking;
pub mod member;
pub mod room;
pub mod scale;
pub mod user;
