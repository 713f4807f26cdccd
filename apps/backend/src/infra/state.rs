use std::sync::Arc;

use crate::config::app::AppConfig;
use crate::config::db::DbKind;
use crate::content::catalog::FallbackCatalog;
use crate::content::llm::LlmContentSource;
use crate::content::ContentSource;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security: SecurityConfig,
    config: AppConfig,
    db_kind: DbKind,
    content: Option<Arc<dyn ContentSource>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security: SecurityConfig::default(),
            config: AppConfig::default(),
            db_kind: DbKind::SqliteMemory,
            content: None,
        }
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = kind;
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_content(mut self, content: Arc<dyn ContentSource>) -> Self {
        self.content = Some(content);
        self
    }

    /// Connect, migrate and wire the content source.
    ///
    /// Without an explicit source the LLM client is used when configured,
    /// otherwise the static catalog.
    pub async fn build(self) -> Result<AppState, AppError> {
        let conn = bootstrap_db(self.db_kind).await?;
        let content: Arc<dyn ContentSource> = match (self.content, &self.config.llm) {
            (Some(source), _) => source,
            (None, Some(llm)) => Arc::new(LlmContentSource::new(llm.clone())?),
            (None, None) => Arc::new(FallbackCatalog::new()),
        };
        Ok(AppState::new(conn, self.security, self.config, content))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
