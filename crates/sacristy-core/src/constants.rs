/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

/// How far ahead recurring bookings are materialized into occurrences.
pub const EXPANSION_WINDOW_MONTHS: u32 = 6;

/// Page size applied when a list request does not name one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
