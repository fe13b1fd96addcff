use std::sync::Arc;

use crate::auth::session::SessionAuthority;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: userhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Issues and resolves session tokens.
    pub sessions: Arc<SessionAuthority>,
}

impl AppState {
    pub fn new(pool: userhub_db::DbPool, config: ServerConfig) -> Self {
        let sessions = Arc::new(SessionAuthority::new(&config.session));
        Self {
            pool,
            config: Arc::new(config),
            sessions,
        }
    }
}
