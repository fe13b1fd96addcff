//! Session claim carried inside an opaque token.

use serde::{Deserialize, Serialize};

use crate::token::TokenError;
use crate::types::{DbId, UnixSeconds};

/// Subject and validity window of a session.
///
/// Serialized with single-letter keys to keep tokens short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "u")]
    pub user_id: DbId,
    #[serde(rename = "n")]
    pub not_before: UnixSeconds,
    #[serde(rename = "e")]
    pub expire_at: UnixSeconds,
}

impl SessionClaims {
    /// A claim for `user_id` valid from `now` for `lifetime_secs` seconds.
    ///
    /// Fails with [`TokenError::Seal`] when the window end does not fit in
    /// an `i64`.
    pub fn new(user_id: DbId, now: UnixSeconds, lifetime_secs: i64) -> Result<Self, TokenError> {
        let expire_at = now.checked_add(lifetime_secs).ok_or_else(|| {
            TokenError::Seal(format!("lifetime {lifetime_secs}s overflows from {now}"))
        })?;
        Ok(Self {
            user_id,
            not_before: now,
            expire_at,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TokenError> {
        serde_json::to_vec(self).map_err(|e| TokenError::Seal(e.to_string()))
    }

    /// Parse an authenticated payload. Anything that is not a well-formed
    /// claim (bad JSON, non-positive subject, empty window) is
    /// [`TokenError::Invalid`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        let claims: SessionClaims =
            serde_json::from_slice(bytes).map_err(|_| TokenError::Invalid)?;
        if claims.user_id <= 0 || claims.expire_at <= claims.not_before {
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }

    /// Check the window against `now`; both bounds are inclusive.
    pub fn validate_at(&self, now: UnixSeconds) -> Result<DbId, TokenError> {
        if now < self.not_before {
            return Err(TokenError::Invalid);
        }
        if now > self.expire_at {
            return Err(TokenError::Expired);
        }
        Ok(self.user_id)
    }
}
