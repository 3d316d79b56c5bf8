use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgentRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub template_id: Option<Uuid>,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog entry: an agent joined with its template metadata.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgentSummary {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub template_id: Option<Uuid>,
    pub template_name: Option<String>,
    pub template_key: Option<String>,
    pub description: Option<String>,
    pub badge: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgentTemplateRow {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub badge: Option<String>,
}
