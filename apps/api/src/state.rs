use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::sources::registry::SourceRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Job source registry, constructed once at startup and injected here
    /// instead of living as a process-wide singleton.
    pub registry: Arc<SourceRegistry>,
}
