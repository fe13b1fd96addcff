//! Named shared counters.

use sqlx::FromRow;
use userhub_core::types::{DbId, Timestamp};

use crate::store::{Column, Record};

/// Full row from the `counters` table.
#[derive(Debug, Clone, FromRow)]
pub struct Counter {
    pub id: DbId,
    pub name: String,
    pub value: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterColumn {
    Id,
    Name,
    Value,
    CreatedAt,
    UpdatedAt,
}

impl Column for CounterColumn {
    fn name(self) -> &'static str {
        match self {
            CounterColumn::Id => "id",
            CounterColumn::Name => "name",
            CounterColumn::Value => "value",
            CounterColumn::CreatedAt => "created_at",
            CounterColumn::UpdatedAt => "updated_at",
        }
    }
}

impl Record for Counter {
    const TABLE: &'static str = "counters";
    type Column = CounterColumn;
    const ALL_COLUMNS: &'static [CounterColumn] = &[
        CounterColumn::Id,
        CounterColumn::Name,
        CounterColumn::Value,
        CounterColumn::CreatedAt,
        CounterColumn::UpdatedAt,
    ];
}
