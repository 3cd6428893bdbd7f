use std::sync::Arc;

use sqlx::SqlitePool;

use crate::completion::CompletionClient;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Remote completion API. Tests swap in a stub.
    pub completion: Arc<dyn CompletionClient>,
    pub config: Config,
}
