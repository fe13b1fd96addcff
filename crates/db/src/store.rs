//! Generic single-table record store.
//!
//! Any table whose rows carry a `BIGINT` primary key named `id` can be
//! exposed through [`RecordRepo`] by implementing [`Record`] once for its
//! row struct. Every operation runs on a caller-supplied `&mut PgConnection`,
//! which is either a pooled connection or an open transaction, so the caller
//! decides the unit of work.
//!
//! Read results are shaped by a [`Projection`]:
//!
//! | Projection          | Output           |
//! |---------------------|------------------|
//! | [`Full`]            | the record `R`   |
//! | [`Scalar<R, T>`]    | one column as `T`|
//! | [`Composite<R, O>`] | a `FromRow` `O`  |

use std::fmt;
use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Decode, FromRow, PgConnection, Postgres, QueryBuilder, Row, Type};
use userhub_core::types::{DbId, Timestamp};

use crate::error::StoreError;

/// Name of the primary key column shared by every record table.
pub const KEY_COLUMN: &str = "id";

// ---------------------------------------------------------------------------
// Record descriptors
// ---------------------------------------------------------------------------

/// A column of one record kind.
pub trait Column: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;
}

/// Shape of a record kind: its table, its columns, and its full-row type.
pub trait Record: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    const TABLE: &'static str;

    type Column: Column;

    /// Columns read by the [`Full`] projection, in struct field order.
    const ALL_COLUMNS: &'static [Self::Column];
}

/// Row lock requested alongside a read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockMode {
    #[default]
    None,
    /// `FOR SHARE`: other readers proceed, writers wait.
    Shared,
    /// `FOR UPDATE`: blocks other lockers until the transaction ends.
    Exclusive,
}

impl LockMode {
    fn clause(self) -> &'static str {
        match self {
            LockMode::None => "",
            LockMode::Shared => " FOR SHARE",
            LockMode::Exclusive => " FOR UPDATE",
        }
    }
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Requested shape of a read result.
pub trait Projection<R: Record>: Sync {
    type Output: Send + Unpin;

    /// Comma-separated select list.
    fn select_list(&self) -> String;

    fn decode(&self, row: &PgRow) -> Result<Self::Output, sqlx::Error>;
}

/// The whole record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Full;

impl<R: Record> Projection<R> for Full {
    type Output = R;

    fn select_list(&self) -> String {
        join_columns(R::ALL_COLUMNS)
    }

    fn decode(&self, row: &PgRow) -> Result<R, sqlx::Error> {
        R::from_row(row)
    }
}

/// A single column decoded as `T`.
pub struct Scalar<R: Record, T> {
    column: R::Column,
    _output: PhantomData<fn() -> T>,
}

impl<R: Record, T> Scalar<R, T> {
    pub fn new(column: R::Column) -> Self {
        Self {
            column,
            _output: PhantomData,
        }
    }
}

impl<R, T> Projection<R> for Scalar<R, T>
where
    R: Record,
    T: for<'r> Decode<'r, Postgres> + Type<Postgres> + Send + Unpin,
{
    type Output = T;

    fn select_list(&self) -> String {
        self.column.name().to_string()
    }

    fn decode(&self, row: &PgRow) -> Result<T, sqlx::Error> {
        row.try_get(0)
    }
}

/// Several columns decoded into `O`, matched by column name.
pub struct Composite<R: Record, O> {
    columns: Vec<R::Column>,
    _output: PhantomData<fn() -> O>,
}

impl<R: Record, O> Composite<R, O> {
    pub fn new(columns: &[R::Column]) -> Self {
        Self {
            columns: columns.to_vec(),
            _output: PhantomData,
        }
    }
}

impl<R, O> Projection<R> for Composite<R, O>
where
    R: Record,
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    type Output = O;

    fn select_list(&self) -> String {
        join_columns(&self.columns)
    }

    fn decode(&self, row: &PgRow) -> Result<O, sqlx::Error> {
        O::from_row(row)
    }
}

fn join_columns<C: Column>(columns: &[C]) -> String {
    columns
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A value bound into an insert or update.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    BigInt(i64),
    Int(i32),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
    /// Emitted as a literal `NULL` so it fits a column of any type.
    Null,
}

impl SqlValue {
    fn push_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            SqlValue::BigInt(v) => qb.push_bind(*v),
            SqlValue::Int(v) => qb.push_bind(*v),
            SqlValue::Text(v) => qb.push_bind(v.clone()),
            SqlValue::Bool(v) => qb.push_bind(*v),
            SqlValue::Timestamp(v) => qb.push_bind(*v),
            SqlValue::Null => qb.push("NULL"),
        };
    }

    fn push_separated(&self, sep: &mut Separated<'_, '_, Postgres, &'static str>) {
        match self {
            SqlValue::BigInt(v) => sep.push_bind(*v),
            SqlValue::Int(v) => sep.push_bind(*v),
            SqlValue::Text(v) => sep.push_bind(v.clone()),
            SqlValue::Bool(v) => sep.push_bind(*v),
            SqlValue::Timestamp(v) => sep.push_bind(*v),
            SqlValue::Null => sep.push("NULL"),
        };
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<Timestamp> for SqlValue {
    fn from(v: Timestamp) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Ordered column assignments for one row.
///
/// Only the columns set here are written; setting a column twice keeps the
/// position of the first assignment and the value of the last.
pub struct Values<R: Record> {
    entries: Vec<(R::Column, SqlValue)>,
}

impl<R: Record> Values<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn set(mut self, column: R::Column, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, column: R::Column) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    fn columns(&self) -> impl Iterator<Item = R::Column> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    fn column_list(&self) -> String {
        self.columns()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<R: Record> Default for Values<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> fmt::Debug for Values<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(c, v)| (c.name(), v)))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Number of insert statements [`RecordRepo::batch_insert`] issues for `len`
/// rows.
pub fn chunk_count(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    len.div_ceil(batch_size)
}

fn select_statement(
    select_list: &str,
    table: &str,
    filter: Option<&str>,
    ordered: bool,
    lock: LockMode,
) -> String {
    let mut sql = format!("SELECT {select_list} FROM {table}");
    if let Some(filter) = filter {
        sql.push_str(" WHERE ");
        sql.push_str(filter);
    }
    if ordered {
        sql.push_str(" ORDER BY ");
        sql.push_str(KEY_COLUMN);
    }
    sql.push_str(lock.clause());
    sql
}

/// CRUD primitives for any [`Record`] kind.
pub struct RecordRepo<R>(PhantomData<fn() -> R>);

impl<R: Record> RecordRepo<R> {
    /// Read one record by key. A missing row is `Ok(None)`.
    pub async fn get_by_id<P: Projection<R>>(
        conn: &mut PgConnection,
        id: DbId,
        projection: &P,
        lock: LockMode,
    ) -> Result<Option<P::Output>, StoreError> {
        let sql = select_statement(
            &projection.select_list(),
            R::TABLE,
            Some("id = $1"),
            false,
            lock,
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
        Ok(row.map(|row| projection.decode(&row)).transpose()?)
    }

    /// Read the records whose keys are in `ids`, ordered by key. Keys with no
    /// row are skipped; an empty `ids` returns immediately.
    pub async fn get_by_ids<P: Projection<R>>(
        conn: &mut PgConnection,
        ids: &[DbId],
        projection: &P,
        lock: LockMode,
    ) -> Result<Vec<P::Output>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = select_statement(
            &projection.select_list(),
            R::TABLE,
            Some("id = ANY($1)"),
            true,
            lock,
        );
        let rows = sqlx::query(&sql).bind(ids).fetch_all(&mut *conn).await?;
        Ok(rows
            .iter()
            .map(|row| projection.decode(row))
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Whether a row with this key exists, without reading its columns.
    pub async fn exists(
        conn: &mut PgConnection,
        id: DbId,
        lock: LockMode,
    ) -> Result<bool, StoreError> {
        let sql = select_statement("1", R::TABLE, Some("id = $1"), false, lock);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
        Ok(row.is_some())
    }

    /// Read every row, ordered by key.
    pub async fn get_all<P: Projection<R>>(
        conn: &mut PgConnection,
        projection: &P,
        lock: LockMode,
    ) -> Result<Vec<P::Output>, StoreError> {
        let sql = select_statement(&projection.select_list(), R::TABLE, None, true, lock);
        let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
        Ok(rows
            .iter()
            .map(|row| projection.decode(row))
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn count_all(conn: &mut PgConnection) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        Ok(sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&mut *conn)
            .await?)
    }

    /// Write the given columns of one row. Returns rows affected (0 or 1).
    pub async fn update_by_id(
        conn: &mut PgConnection,
        id: DbId,
        values: &Values<R>,
    ) -> Result<u64, StoreError> {
        if values.is_empty() {
            return Err(StoreError::EmptyValues);
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", R::TABLE));
        for (i, (column, value)) in values.entries.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column.name()).push(" = ");
            value.push_to(&mut qb);
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(conn: &mut PgConnection, id: DbId) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_ids(conn: &mut PgConnection, ids: &[DbId]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", R::TABLE);
        let result = sqlx::query(&sql).bind(ids).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Insert one row and return its key. Columns not set take their
    /// defaults; `id` is assigned by the sequence unless supplied.
    pub async fn insert(conn: &mut PgConnection, values: &Values<R>) -> Result<DbId, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {}", R::TABLE));
        if values.is_empty() {
            qb.push(" DEFAULT VALUES");
        } else {
            qb.push(" (").push(values.column_list()).push(") VALUES (");
            for (i, (_, value)) in values.entries.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                value.push_to(&mut qb);
            }
            qb.push(")");
        }
        qb.push(" RETURNING ").push(KEY_COLUMN);

        Ok(qb
            .build_query_scalar::<DbId>()
            .fetch_one(&mut *conn)
            .await?)
    }

    /// Insert many rows, one multi-row `INSERT` per `batch_size` rows.
    ///
    /// Every row must assign the same columns in the same order. The first
    /// failing chunk aborts the remaining ones; run inside a transaction to
    /// discard the chunks already written.
    pub async fn batch_insert(
        conn: &mut PgConnection,
        rows: &[Values<R>],
        batch_size: usize,
    ) -> Result<u64, StoreError> {
        if batch_size == 0 {
            return Err(StoreError::InvalidBatchSize);
        }
        let Some(first) = rows.first() else {
            return Ok(0);
        };
        if first.is_empty() {
            return Err(StoreError::EmptyValues);
        }
        for (i, row) in rows.iter().enumerate().skip(1) {
            if !row.columns().eq(first.columns()) {
                return Err(StoreError::RowShape {
                    row: i,
                    expected: first.column_list(),
                    found: row.column_list(),
                });
            }
        }

        let head = format!("INSERT INTO {} ({}) ", R::TABLE, first.column_list());
        let mut total = 0;
        for chunk_no in 0..chunk_count(rows.len(), batch_size) {
            let start = chunk_no * batch_size;
            let chunk = &rows[start..(start + batch_size).min(rows.len())];
            let mut qb = QueryBuilder::<Postgres>::new(head.as_str());
            qb.push_values(chunk, |mut sep, row| {
                for (_, value) in &row.entries {
                    value.push_separated(&mut sep);
                }
            });
            let result = qb.build().execute(&mut *conn).await?;
            tracing::debug!(
                table = R::TABLE,
                chunk = chunk_no,
                rows = result.rows_affected(),
                "Inserted batch chunk"
            );
            total += result.rows_affected();
        }
        Ok(total)
    }
}
