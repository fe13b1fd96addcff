//! User directory: registration, credential checks, and the user
//! operations the HTTP layer needs.
//!
//! Every function takes a `&mut PgConnection`, so callers decide whether it
//! runs inside a transaction. Passwords are hashed here and never leave as
//! plaintext.

use sqlx::PgConnection;
use userhub_core::error::CoreError;
use userhub_core::types::DbId;
use userhub_db::models::user::{new_user, User, UserColumn, UserSummary};
use userhub_db::repositories::UserRepo;
use userhub_db::store::{LockMode, Projection, Values};
use userhub_db::StoreError;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

const NAME_CONSTRAINT: &str = "uq_users_name";

pub struct UserDirectory;

impl UserDirectory {
    /// Create a user with a freshly hashed password and return its id.
    pub async fn register(conn: &mut PgConnection, name: &str, password: &str) -> AppResult<DbId> {
        let hash = hash_password(password).map_err(|e| AppError::InternalError(e.to_string()))?;
        UserRepo::insert(conn, &new_user(name, &hash))
            .await
            .map_err(|err| name_conflict(err, name))
    }

    /// Check a name/password pair. `None` for an unknown name, a wrong
    /// password, or a stored hash that cannot be verified.
    pub async fn authenticate(
        conn: &mut PgConnection,
        name: &str,
        password: &str,
    ) -> AppResult<Option<DbId>> {
        let Some(credentials) = UserRepo::find_credentials_by_name(conn, name).await? else {
            return Ok(None);
        };

        match verify_password(&credentials.password, password) {
            Ok(true) => Ok(Some(credentials.id)),
            Ok(false) => Ok(None),
            Err(err) => {
                tracing::warn!(user_id = credentials.id, error = %err, "Stored password hash could not be verified");
                Ok(None)
            }
        }
    }

    /// Replace name and password. Returns rows affected (0 or 1).
    pub async fn update_identity(
        conn: &mut PgConnection,
        id: DbId,
        name: &str,
        password: &str,
    ) -> AppResult<u64> {
        let hash = hash_password(password).map_err(|e| AppError::InternalError(e.to_string()))?;
        let values = Values::<User>::new()
            .set(UserColumn::Name, name)
            .set(UserColumn::Password, hash);
        UserRepo::update_by_id(conn, id, &values)
            .await
            .map_err(|err| name_conflict(err, name))
    }

    /// Change only the name. Returns rows affected (0 or 1).
    pub async fn rename(conn: &mut PgConnection, id: DbId, name: &str) -> AppResult<u64> {
        let values = Values::<User>::new().set(UserColumn::Name, name);
        UserRepo::update_by_id(conn, id, &values)
            .await
            .map_err(|err| name_conflict(err, name))
    }

    pub async fn get_projection<P: Projection<User>>(
        conn: &mut PgConnection,
        id: DbId,
        projection: &P,
    ) -> AppResult<Option<P::Output>> {
        Ok(UserRepo::get_by_id(conn, id, projection, LockMode::None).await?)
    }

    /// Every user in id order, without password hashes.
    pub async fn list_all(conn: &mut PgConnection) -> AppResult<Vec<UserSummary>> {
        Ok(UserRepo::get_all(conn, &UserSummary::projection(), LockMode::None).await?)
    }

    pub async fn delete_by_name(conn: &mut PgConnection, name: &str) -> AppResult<u64> {
        Ok(UserRepo::delete_by_name(conn, name).await?)
    }
}

fn name_conflict(err: StoreError, name: &str) -> AppError {
    if err.is_unique_violation(NAME_CONSTRAINT) {
        AppError::Core(CoreError::Conflict(format!(
            "User name '{name}' is already taken"
        )))
    } else {
        err.into()
    }
}
