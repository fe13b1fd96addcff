//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a Bearer session token.
//! - [`rbac::RequireAdmin`] -- Requires the administrator account.
//! - [`etag::etag`] -- Entity tags and `304 Not Modified` for GET JSON responses.

pub mod auth;
pub mod etag;
pub mod rbac;
