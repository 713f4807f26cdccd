use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::app::AppConfig;
use crate::content::ContentSource;
use crate::ws::hub::SessionHub;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub security: SecurityConfig,
    pub config: AppConfig,
    /// Realtime fan-out for session change notifications.
    pub hub: Arc<SessionHub>,
    pub content: Arc<dyn ContentSource>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        security: SecurityConfig,
        config: AppConfig,
        content: Arc<dyn ContentSource>,
    ) -> Self {
        Self {
            db,
            security,
            config,
            hub: Arc::new(SessionHub::new()),
            content,
        }
    }
}
