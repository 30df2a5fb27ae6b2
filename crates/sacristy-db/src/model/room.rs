use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::room;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = room)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub capacity: Option<i32>,
    /// Display color used by the calendar frontend, e.g. `#2e7d32`.
    pub color: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = room)]
pub struct NewRoom<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub capacity: Option<i32>,
    pub color: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Full-replace changeset for `PUT /api/rooms/<room_id>`.
///
/// `treat_none_as_null` makes an omitted optional field clear the column,
/// matching PUT semantics.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = room)]
#[diesel(treat_none_as_null = true)]
pub struct RoomChanges<'a> {
    pub name: &'a str,
    pub capacity: Option<i32>,
    pub color: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
