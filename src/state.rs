use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::session::SessionStore;

/// Shared by every handler: configuration, API client and the session table
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: BackendClient,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&config.backend)?;
        let sessions = Arc::new(SessionStore::new(config.session.idle_timeout_mins));
        Ok(Self {
            config: Arc::new(config),
            backend,
            sessions,
        })
    }
}
