//! Session tokens: issue a sealed token for a user id, resolve one back.
//!
//! A token is the [`TokenCodec`] sealing of compact [`SessionClaims`]. Its
//! validity window is `[not_before, expire_at]`, both inclusive. Resolution
//! does not consult the database: a token for a deleted user stays valid
//! until it expires.

use chrono::Utc;
use userhub_core::claims::SessionClaims;
use userhub_core::token::{TokenCodec, TokenError, TokenKey};
use userhub_core::types::{DbId, UnixSeconds};

/// Default session lifetime: 7 days.
pub const DEFAULT_EXPIRATION_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest accepted session lifetime: 10 years.
pub const MAX_EXPIRATION_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Configuration for session token issuing and validation.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 32-byte symmetric key shared by every server instance.
    pub key: TokenKey,
    /// Token lifetime in seconds (default: 7 days).
    pub expiration_secs: i64,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default  |
    /// |-------------------------|----------|----------|
    /// | `TOKEN_KEY`             | **yes**  | --       |
    /// | `TOKEN_EXPIRATION_SECS` | no       | `604800` |
    ///
    /// # Panics
    ///
    /// Panics if `TOKEN_KEY` is missing or is not base64 for exactly 32
    /// bytes, or if the expiration is not a positive integer no larger than
    /// [`MAX_EXPIRATION_SECS`].
    pub fn from_env() -> Self {
        let encoded =
            std::env::var("TOKEN_KEY").expect("TOKEN_KEY must be set in the environment");
        let key = TokenKey::from_base64(&encoded)
            .unwrap_or_else(|e| panic!("TOKEN_KEY is invalid: {e}"));

        let expiration_secs: i64 = std::env::var("TOKEN_EXPIRATION_SECS")
            .unwrap_or_else(|_| DEFAULT_EXPIRATION_SECS.to_string())
            .parse()
            .expect("TOKEN_EXPIRATION_SECS must be a valid i64");
        if let Err(msg) = check_expiration(expiration_secs) {
            panic!("TOKEN_EXPIRATION_SECS {msg}");
        }

        Self {
            key,
            expiration_secs,
        }
    }
}

/// Lifetimes must be positive and at most [`MAX_EXPIRATION_SECS`].
pub fn check_expiration(expiration_secs: i64) -> Result<(), String> {
    if expiration_secs <= 0 {
        return Err(format!("must be positive, got {expiration_secs}"));
    }
    if expiration_secs > MAX_EXPIRATION_SECS {
        return Err(format!(
            "must be at most {MAX_EXPIRATION_SECS}, got {expiration_secs}"
        ));
    }
    Ok(())
}

/// Issues and resolves session tokens with one key and one lifetime.
#[derive(Debug)]
pub struct SessionAuthority {
    codec: TokenCodec,
    lifetime_secs: i64,
}

impl SessionAuthority {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            codec: TokenCodec::new(&config.key),
            lifetime_secs: config.expiration_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issue a token for `user_id` valid from `now` through `now + lifetime`.
    pub fn issue(&self, user_id: DbId, now: UnixSeconds) -> Result<String, TokenError> {
        if user_id <= 0 {
            return Err(TokenError::Seal(format!(
                "user id must be positive, got {user_id}"
            )));
        }
        self.seal_claims(&SessionClaims::new(user_id, now, self.lifetime_secs)?)
    }

    /// Seal arbitrary claims. Used by [`issue`](Self::issue) and by tests
    /// that need tokens with a specific window.
    pub fn seal_claims(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        self.codec.seal(&claims.to_bytes()?)
    }

    /// Resolve a token to the user id it was issued for.
    ///
    /// Fails with [`TokenError::Invalid`] when the token does not
    /// authenticate, its claims are malformed, or `now` is before the
    /// window; with [`TokenError::Expired`] once `now` is past `expire_at`.
    pub fn resolve(&self, token: &str, now: UnixSeconds) -> Result<DbId, TokenError> {
        let payload = self.codec.open(token)?;
        SessionClaims::from_bytes(&payload)?.validate_at(now)
    }

    pub fn issue_now(&self, user_id: DbId) -> Result<String, TokenError> {
        self.issue(user_id, Utc::now().timestamp())
    }

    pub fn resolve_now(&self, token: &str) -> Result<DbId, TokenError> {
        self.resolve(token, Utc::now().timestamp())
    }
}
