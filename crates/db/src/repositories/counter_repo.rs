//! Repository for the `counters` table.

use sqlx::PgPool;

/// Atomic named counters.
pub struct CounterRepo;

impl CounterRepo {
    /// Increment `name` by one, creating it at 1, and return the new value.
    ///
    /// A single upsert statement: concurrent callers each observe a distinct
    /// value with no application-side locking.
    pub async fn increment(pool: &PgPool, name: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO counters (name, value) VALUES ($1, 1)
             ON CONFLICT (name) DO UPDATE SET value = counters.value + 1
             RETURNING value",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }
}
