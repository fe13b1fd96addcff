//! User-specific queries on top of the generic record store.

use sqlx::PgConnection;

use crate::error::StoreError;
use crate::models::user::{User, UserCredentials};
use crate::store::RecordRepo;

/// Record store for the `users` table.
pub type UserRepo = RecordRepo<User>;

impl RecordRepo<User> {
    /// Find the key and stored hash for a user by name (case-sensitive).
    pub async fn find_credentials_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserCredentials>("SELECT id, password FROM users WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut *conn)
                .await?,
        )
    }

    /// Delete a user by name. Returns rows affected.
    pub async fn delete_by_name(conn: &mut PgConnection, name: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE name = $1")
            .bind(name)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
