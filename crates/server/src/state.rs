//! Shared application state for request handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::services::auth::AuthService;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
    auth: AuthService,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        let auth = AuthService::new(&config.jwt_secret, config.token_ttl_hours);
        Self {
            inner: Arc::new(AppStateInner { config, pool, auth }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
