//! Query composition for `app_user` table operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::app_user;
use crate::model::user::{NewUser, User};

/// Returns a query for all users, ordered by name.
#[must_use]
pub fn all() -> app_user::BoxedQuery<'static, diesel::pg::Pg> {
    app_user::table.order(app_user::name.asc()).into_boxed()
}

/// Returns a query for a user by id.
#[must_use]
pub fn by_id(id: Uuid) -> app_user::BoxedQuery<'static, diesel::pg::Pg> {
    app_user::table.filter(app_user::id.eq(id)).into_boxed()
}

/// Returns a query for a user by email.
#[must_use]
pub fn by_email(email: &str) -> app_user::BoxedQuery<'_, diesel::pg::Pg> {
    app_user::table
        .filter(app_user::email.eq(email))
        .into_boxed()
}

/// Counts all users.
///
/// ## Errors
/// Returns a database error if the count fails.
pub async fn count(conn: &mut DbConnection<'_>) -> QueryResult<i64> {
    app_user::table.count().get_result(conn).await
}

/// Loads one page of users.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_page(
    conn: &mut DbConnection<'_>,
    limit: i64,
    offset: i64,
) -> QueryResult<Vec<User>> {
    all()
        .limit(limit)
        .offset(offset)
        .select(User::as_select())
        .load(conn)
        .await
}

/// Finds a user by id, `None` if absent.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<User>> {
    by_id(id)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// Finds a user by email, `None` if absent.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_email(conn: &mut DbConnection<'_>, email: &str) -> QueryResult<Option<User>> {
    by_email(email)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// Inserts a user and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails, including unique-email
/// violations.
pub async fn insert(conn: &mut DbConnection<'_>, new_user: &NewUser<'_>) -> QueryResult<User> {
    diesel::insert_into(app_user::table)
        .values(new_user)
        .returning(User::as_select())
        .get_result(conn)
        .await
}

/// Replaces a user's password hash.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_password_hash(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    password_hash: &str,
) -> QueryResult<usize> {
    diesel::update(app_user::table.filter(app_user::id.eq(id)))
        .set((
            app_user::password_hash.eq(password_hash),
            app_user::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
}

/// Deletes a user row.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(app_user::table.filter(app_user::id.eq(id)))
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
    fn test_all_orders_by_name() {
        assert!(sql_of(&all()).contains("ORDER BY"));
    }

    #[test]
    fn test_by_email_filters_on_email() {
        assert!(sql_of(&by_email("a@b.c")).contains("email"));
    }

    #[test]
    fn test_by_id_filters_on_id() {
        let sql = sql_of(&by_id(Uuid::nil()));
        assert!(sql.contains("WHERE"));
        assert!(sql.contains("id"));
    }
}
