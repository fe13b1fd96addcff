/// Failures raised by the record store.
///
/// A missing row or an update that touched nothing is *not* an error; those
/// come back as `None`, `false`, or a zero row count.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),

    #[error("No column values supplied")]
    EmptyValues,

    #[error("Batch row {row} assigns columns [{found}], expected [{expected}]")]
    RowShape {
        row: usize,
        expected: String,
        found: String,
    },

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
}

impl StoreError {
    /// Whether this is a PostgreSQL unique violation (`23505`) on `constraint`.
    pub fn is_unique_violation(&self, constraint: &str) -> bool {
        match self {
            StoreError::Sql(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
            }
            _ => false,
        }
    }
}
