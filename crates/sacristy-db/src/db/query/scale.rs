//! Query composition for `scale` and `scale_assignment` table operations.
//!
//! Writes that touch a scale and its assignments run inside a single
//! transaction so a roster is never observable half-replaced.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::{member, scale, scale_assignment};
use crate::model::scale::{NewScale, NewScaleAssignment, Scale, ScaleAssignment, ScaleChanges};

/// Returns a query for all scales, most recently updated first.
#[must_use]
pub fn all() -> scale::BoxedQuery<'static, diesel::pg::Pg> {
    scale::table.order(scale::updated_at.desc()).into_boxed()
}

/// Returns a query for a scale by id.
#[must_use]
pub fn by_id(id: Uuid) -> scale::BoxedQuery<'static, diesel::pg::Pg> {
    scale::table.filter(scale::id.eq(id)).into_boxed()
}

/// Counts all scales.
///
/// ## Errors
/// Returns a database error if the count fails.
pub async fn count(conn: &mut DbConnection<'_>) -> QueryResult<i64> {
    scale::table.count().get_result(conn).await
}

/// Loads one page of scales.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_page(
    conn: &mut DbConnection<'_>,
    limit: i64,
    offset: i64,
) -> QueryResult<Vec<Scale>> {
    all()
        .limit(limit)
        .offset(offset)
        .select(Scale::as_select())
        .load(conn)
        .await
}

/// Finds a scale by id, `None` if absent.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Scale>> {
    by_id(id)
        .select(Scale::as_select())
        .first(conn)
        .await
        .optional()
}

/// Loads the assignments of a scale with each member's name resolved,
/// ordered by duty.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn load_assignments(
    conn: &mut DbConnection<'_>,
    scale_id: Uuid,
) -> QueryResult<Vec<(ScaleAssignment, String)>> {
    scale_assignment::table
        .inner_join(member::table)
        .filter(scale_assignment::scale_id.eq(scale_id))
        .order(scale_assignment::duty.asc())
        .select((ScaleAssignment::as_select(), member::name))
        .load(conn)
        .await
}

/// Inserts a scale together with its assignments, atomically.
///
/// ## Errors
/// Returns a database error if any statement fails; the transaction rolls
/// back and nothing is stored.
pub async fn insert_with_assignments(
    conn: &mut DbConnection<'_>,
    new_scale: &NewScale<'_>,
    assignments: &[NewScaleAssignment<'_>],
) -> QueryResult<Scale> {
    let conn: &mut diesel_async::AsyncPgConnection = conn;
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        async move {
            let stored = diesel::insert_into(scale::table)
                .values(new_scale)
                .returning(Scale::as_select())
                .get_result(conn)
                .await?;

            if !assignments.is_empty() {
                diesel::insert_into(scale_assignment::table)
                    .values(assignments)
                    .execute(conn)
                    .await?;
            }

            Ok(stored)
        }
        .scope_boxed()
    })
    .await
}

/// Applies a full-replace changeset to a scale and swaps its assignment set,
/// atomically.
///
/// ## Errors
/// Returns `diesel::result::Error::NotFound` if the scale does not exist, or
/// any other database error; the transaction rolls back on failure.
pub async fn update_with_assignments(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &ScaleChanges<'_>,
    assignments: &[NewScaleAssignment<'_>],
) -> QueryResult<Scale> {
    let conn: &mut diesel_async::AsyncPgConnection = conn;
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        async move {
            let stored = diesel::update(scale::table.filter(scale::id.eq(id)))
                .set(changes)
                .returning(Scale::as_select())
                .get_result(conn)
                .await?;

            diesel::delete(scale_assignment::table.filter(scale_assignment::scale_id.eq(id)))
                .execute(conn)
                .await?;

            if !assignments.is_empty() {
                diesel::insert_into(scale_assignment::table)
                    .values(assignments)
                    .execute(conn)
                    .await?;
            }

            Ok(stored)
        }
        .scope_boxed()
    })
    .await
}

/// Deletes a scale row; its assignments cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(scale::table.filter(scale::id.eq(id)))
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
    fn test_all_orders_by_updated_at() {
        assert!(sql_of(&all()).contains("ORDER BY"));
    }

    #[test]
    fn test_by_id_filters_on_id() {
        assert!(sql_of(&by_id(Uuid::nil())).contains("WHERE"));
    }
}
