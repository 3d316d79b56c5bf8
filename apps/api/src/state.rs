use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::generation::jd_generator::JdGenerator;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable JD generator. Default: OpenAiJdGenerator.
    pub jd_generator: Arc<dyn JdGenerator>,
}
