use std::sync::Arc;

use catalens_openai::OpenAiClient;
use tera::Tera;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: catalens_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the transcription and vision endpoints.
    pub openai: Arc<OpenAiClient>,
    /// Compiled page templates.
    pub templates: Arc<Tera>,
}
