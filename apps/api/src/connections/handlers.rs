use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::connection::{ConnectionRow, ConnectionSummary};
use crate::models::MessageResponse;
use crate::state::AppState;

/// GET /api/v1/connect/list
pub async fn handle_list_connections(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ConnectionSummary>>, AppError> {
    let rows = sqlx::query_as::<_, ConnectionRow>(
        r#"
        SELECT id, provider, status, created_at, updated_at
        FROM connections
        WHERE company_id = $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user.company_id())
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows.into_iter().map(ConnectionSummary::from).collect()))
}

/// POST /api/v1/connect/disconnect/:id
///
/// Marks the connection disconnected and forgets its OAuth tokens.
pub async fn handle_disconnect(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let disconnected: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE connections
        SET status = 'DISCONNECTED', access_token = NULL, refresh_token = NULL, updated_at = NOW()
        WHERE id = $1 AND company_id = $2
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(user.company_id())
    .fetch_optional(&state.db)
    .await?;

    if disconnected.is_none() {
        return Err(AppError::NotFound("Connection not found".to_string()));
    }
    info!("Disconnected connection {id} for company {}", user.company_id());
    Ok(Json(MessageResponse {
        message: "Disconnected",
    }))
}
