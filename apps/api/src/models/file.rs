use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of the only files listed today: uploaded PowerPoint templates.
pub const PPT_TEMPLATE: &str = "PPT_TEMPLATE";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub file_type: String,
    pub original_name: Option<String>,
    pub storage_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
