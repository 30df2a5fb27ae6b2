//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Repeat rule of a booking row.
///
/// Maps to `booking.repeat` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum RepeatKind {
    /// One-shot booking pinned to `booking_date`.
    #[default]
    None,
    /// Repeats every day of the expansion window.
    Day,
    /// Repeats on the weekday named by `repeat_day`.
    Week,
    /// Repeats on the day-of-month named by `repeat_day`.
    Month,
}

impl ToSql<Text, Pg> for RepeatKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for RepeatKind {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"none" => Ok(Self::None),
            b"day" => Ok(Self::Day),
            b"week" => Ok(Self::Week),
            b"month" => Ok(Self::Month),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl RepeatKind {
    /// Returns the database string representation of this repeat kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for RepeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("unrecognized repeat kind: {other}")),
        }
    }
}

/// Dashboard access level of a user.
///
/// Maps to `app_user.role` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// May manage users in addition to everything staff can do.
    Admin,
    #[default]
    Staff,
}

impl ToSql<Text, Pg> for UserRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for UserRole {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"admin" => Ok(Self::Admin),
            b"staff" => Ok(Self::Staff),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl UserRole {
    /// Returns the database string representation of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_kind_round_trips_through_str() {
        for kind in [
            RepeatKind::None,
            RepeatKind::Day,
            RepeatKind::Week,
            RepeatKind::Month,
        ] {
            assert_eq!(kind.as_str().parse::<RepeatKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_repeat_kind_rejects_unknown() {
        assert!("fortnight".parse::<RepeatKind>().is_err());
    }

    #[test]
    fn test_repeat_kind_default_is_none() {
        assert_eq!(RepeatKind::default(), RepeatKind::None);
    }

    #[test]
    fn test_repeat_kind_serde_uses_lowercase() {
        let json = serde_json::to_string(&RepeatKind::Week).expect("serializes");
        assert_eq!(json, "\"week\"");
        let parsed: RepeatKind = serde_json::from_str("\"month\"").expect("deserializes");
        assert_eq!(parsed, RepeatKind::Month);
    }
}
