//! User record and its projections.

use serde::Serialize;
use sqlx::FromRow;
use userhub_core::types::{DbId, Timestamp};

use crate::store::{Column, Composite, Record, Scalar, Values};

/// Full row from the `users` table.
///
/// `password` holds the verifier hash. NEVER serialize this struct to API
/// responses; read one of the projections below instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub password: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Id,
    Name,
    Password,
    CreatedAt,
    UpdatedAt,
}

impl Column for UserColumn {
    fn name(self) -> &'static str {
        match self {
            UserColumn::Id => "id",
            UserColumn::Name => "name",
            UserColumn::Password => "password",
            UserColumn::CreatedAt => "created_at",
            UserColumn::UpdatedAt => "updated_at",
        }
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    type Column = UserColumn;
    const ALL_COLUMNS: &'static [UserColumn] = &[
        UserColumn::Id,
        UserColumn::Name,
        UserColumn::Password,
        UserColumn::CreatedAt,
        UserColumn::UpdatedAt,
    ];
}

/// Public `{id, name}` view.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserIdentity {
    pub id: DbId,
    pub name: String,
}

impl UserIdentity {
    pub fn projection() -> Composite<User, UserIdentity> {
        Composite::new(&[UserColumn::Id, UserColumn::Name])
    }
}

/// Audit timestamps, serialized as epoch seconds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserTimes {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

impl UserTimes {
    pub fn projection() -> Composite<User, UserTimes> {
        Composite::new(&[UserColumn::CreatedAt, UserColumn::UpdatedAt])
    }
}

/// Listing view: everything except the password hash.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

impl UserSummary {
    pub fn projection() -> Composite<User, UserSummary> {
        Composite::new(&[
            UserColumn::Id,
            UserColumn::Name,
            UserColumn::CreatedAt,
            UserColumn::UpdatedAt,
        ])
    }
}

/// Login lookup: key and stored hash.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: DbId,
    pub password: String,
}

/// The `name` column alone.
pub fn name_column() -> Scalar<User, String> {
    Scalar::new(UserColumn::Name)
}

/// Column values for a new user. `password_hash` must already be hashed.
pub fn new_user(name: &str, password_hash: &str) -> Values<User> {
    Values::new()
        .set(UserColumn::Name, name)
        .set(UserColumn::Password, password_hash)
}
