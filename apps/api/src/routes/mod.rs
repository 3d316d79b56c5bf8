pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agents::handlers as agents;
use crate::assistant::handlers as assistant;
use crate::auth::handlers as auth;
use crate::connections::handlers as connections;
use crate::drafts::handlers as drafts;
use crate::files::handlers as files;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/refresh", post(auth::handle_refresh))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // JD drafts
        .route(
            "/api/v1/jd/drafts",
            post(drafts::handle_create_draft).get(drafts::handle_list_drafts),
        )
        .route(
            "/api/v1/jd/drafts/:id",
            get(drafts::handle_get_draft).patch(drafts::handle_update_draft),
        )
        .route(
            "/api/v1/jd/drafts/:id/generate",
            post(drafts::handle_generate_draft),
        )
        .route(
            "/api/v1/jd/drafts/:id/save-version",
            post(drafts::handle_save_version),
        )
        .route(
            "/api/v1/jd/drafts/:id/versions",
            get(drafts::handle_list_versions),
        )
        .route(
            "/api/v1/jd/drafts/:id/submit-review",
            post(drafts::handle_submit_for_review),
        )
        .route(
            "/api/v1/jd/drafts/:id/export/pdf",
            get(drafts::handle_export_pdf),
        )
        .route(
            "/api/v1/jd/drafts/:id/export/excel",
            get(drafts::handle_export_excel),
        )
        .route("/api/v1/jd/enforce", post(drafts::handle_enforce))
        // Agent catalog
        .route(
            "/api/v1/agents",
            get(agents::handle_list_agents).post(agents::handle_create_agent),
        )
        .route("/api/v1/agents/templates", get(agents::handle_list_templates))
        .route("/api/v1/agents/:id", get(agents::handle_get_agent))
        // Assistant
        .route("/api/v1/ai/chat", post(assistant::handle_chat))
        // Files and storage connections
        .route("/api/v1/files", get(files::handle_list_files))
        .route("/api/v1/connect/list", get(connections::handle_list_connections))
        .route(
            "/api/v1/connect/disconnect/:id",
            post(connections::handle_disconnect),
        )
        .with_state(state)
}
