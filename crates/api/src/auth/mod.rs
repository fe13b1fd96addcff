//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Sealed session token issuing and resolution.

pub mod password;
pub mod session;
