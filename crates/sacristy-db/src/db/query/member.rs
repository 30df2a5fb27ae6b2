//! Query composition for `member` table operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::member;
use crate::model::member::{Member, MemberChanges, NewMember};

/// Returns a query for all members, ordered by name.
#[must_use]
pub fn all() -> member::BoxedQuery<'static, diesel::pg::Pg> {
    member::table.order(member::name.asc()).into_boxed()
}

/// Returns a query for a member by id.
#[must_use]
pub fn by_id(id: Uuid) -> member::BoxedQuery<'static, diesel::pg::Pg> {
    member::table.filter(member::id.eq(id)).into_boxed()
}

/// Returns a query with the optional case-insensitive name search applied.
#[must_use]
pub fn searched(search: Option<&str>) -> member::BoxedQuery<'static, diesel::pg::Pg> {
    match search {
        Some(needle) if !needle.is_empty() => {
            all().filter(member::name.ilike(format!("%{needle}%")))
        }
        _ => all(),
    }
}

/// Counts members matching the optional name search.
///
/// ## Errors
/// Returns a database error if the count fails.
pub async fn count_searched(conn: &mut DbConnection<'_>, search: Option<&str>) -> QueryResult<i64> {
    searched(search).count().get_result(conn).await
}

/// Loads one page of members matching the optional name search.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_page(
    conn: &mut DbConnection<'_>,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> QueryResult<Vec<Member>> {
    searched(search)
        .limit(limit)
        .offset(offset)
        .select(Member::as_select())
        .load(conn)
        .await
}

/// Finds a member by id, `None` if absent.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Member>> {
    by_id(id)
        .select(Member::as_select())
        .first(conn)
        .await
        .optional()
}

/// Inserts a member and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_member: &NewMember<'_>,
) -> QueryResult<Member> {
    diesel::insert_into(member::table)
        .values(new_member)
        .returning(Member::as_select())
        .get_result(conn)
        .await
}

/// Applies a full-replace changeset to a member and returns the updated row.
///
/// ## Errors
/// Returns `diesel::result::Error::NotFound` if the member does not exist,
/// or any other database error.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &MemberChanges<'_>,
) -> QueryResult<Member> {
    diesel::update(member::table.filter(member::id.eq(id)))
        .set(changes)
        .returning(Member::as_select())
        .get_result(conn)
        .await
}

/// Deletes a member row. Assignments referencing the member go with it via
/// the `ON DELETE CASCADE` on `scale_assignment`.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(member::table.filter(member::id.eq(id)))
        .execute(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of<Q>(query: &Q) -> String
    where
        Q: diesel::query_builder::QueryFragment<diesel::pg::Pg>,
    {
        diesel::debug_query::<diesel::pg::Pg, _>(query).to_string()
    }

    #[test]
    fn test_search_applies_ilike() {
        assert!(sql_of(&searched(Some("maria"))).contains("ILIKE"));
    }

    #[test]
    fn test_empty_search_is_unfiltered() {
        assert!(!sql_of(&searched(Some(""))).contains("ILIKE"));
        assert!(!sql_of(&searched(None)).contains("ILIKE"));
    }
}
