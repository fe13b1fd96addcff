//! userhub API server library.
//!
//! Exposes config, state, error handling, the user directory, and routes so
//! the binaries and the integration tests share them.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
