use std::fmt;

use crate::types::DbId;

/// Why a request could not be associated with a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No bearer credentials were presented.
    NotAuthenticated,
    /// The token failed authentication, was malformed, or is not yet valid.
    InvalidToken,
    /// The token was valid once but its window has closed.
    ExpiredToken,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AuthFailure::NotAuthenticated => "Not authenticated",
            AuthFailure::InvalidToken => "Could not validate credentials",
            AuthFailure::ExpiredToken => "Token has expired",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(AuthFailure),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
