//! Administrator rule.
//!
//! There is no role table: the account with id 1 (created by the
//! `create-admin` tool on a fresh database) is the administrator.

use crate::types::DbId;

/// Id of the administrator account.
pub const ADMIN_USER_ID: DbId = 1;

/// Whether `user_id` is the administrator.
pub fn is_admin(user_id: DbId) -> bool {
    user_id == ADMIN_USER_ID
}
