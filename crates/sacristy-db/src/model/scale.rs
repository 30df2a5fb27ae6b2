//! Volunteer service rosters ("escalas") and their member assignments.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::{scale, scale_assignment};

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = scale)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Scale {
    pub id: Uuid,
    pub description: String,
    /// Service date in the legacy textual form.
    pub scale_date: Option<String>,
    pub start_time: Option<String>,
    pub room_id: Option<Uuid>,
    pub notes: Option<String>,
    pub user_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scale)]
pub struct NewScale<'a> {
    pub id: Uuid,
    pub description: &'a str,
    pub scale_date: Option<&'a str>,
    pub start_time: Option<&'a str>,
    pub room_id: Option<Uuid>,
    pub notes: Option<&'a str>,
    pub user_id: Uuid,
}

/// Full-replace changeset for `PUT /api/scales/<scale_id>`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = scale)]
#[diesel(treat_none_as_null = true)]
pub struct ScaleChanges<'a> {
    pub description: &'a str,
    pub scale_date: Option<&'a str>,
    pub start_time: Option<&'a str>,
    pub room_id: Option<Uuid>,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// One member's duty on a scale, e.g. "som" or "projecao".
#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = scale_assignment)]
#[diesel(belongs_to(Scale))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScaleAssignment {
    pub id: Uuid,
    pub scale_id: Uuid,
    pub member_id: Uuid,
    pub duty: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scale_assignment)]
pub struct NewScaleAssignment<'a> {
    pub id: Uuid,
    pub scale_id: Uuid,
    pub member_id: Uuid,
    pub duty: &'a str,
}
