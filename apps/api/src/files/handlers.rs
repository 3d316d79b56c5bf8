use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::file::{FileRow, PPT_TEMPLATE};
use crate::state::AppState;

/// GET /api/v1/files
///
/// The company's PowerPoint templates, newest first.
pub async fn handle_list_files(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<FileRow>>, AppError> {
    let files = sqlx::query_as::<_, FileRow>(
        r#"
        SELECT id, type, original_name, storage_path, created_at
        FROM files
        WHERE company_id = $1 AND type = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(user.company_id())
    .bind(PPT_TEMPLATE)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(files))
}
