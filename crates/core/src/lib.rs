//! Shared building blocks for the userhub workspace.
//!
//! - [`types`] -- primary key and timestamp aliases.
//! - [`error`] -- the domain error taxonomy used by every crate.
//! - [`token`] -- authenticated-encryption codec for opaque session tokens.
//! - [`claims`] -- the session claim carried inside a token.
//! - [`roles`] -- the administrator rule.

pub mod claims;
pub mod error;
pub mod roles;
pub mod token;
pub mod types;
