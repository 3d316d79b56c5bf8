use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness only; never touches the database. `ok` is kept for older frontends.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "status": "ok",
        "service": "hrc-api",
        "version": env!("CARGO_PKG_VERSION"),
        "llm_configured": state.llm.is_configured()
    }))
}
