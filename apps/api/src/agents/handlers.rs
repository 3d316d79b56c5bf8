use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::agent::{AgentRow, AgentSummary, AgentTemplateRow};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AgentSearchQuery {
    pub q: Option<String>,
}

impl AgentSearchQuery {
    /// ILIKE pattern for a non-blank search term.
    pub fn pattern(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{q}%"))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    pub name: Option<String>,
    pub template_id: Option<Uuid>,
}

/// GET /api/v1/agents?q=
pub async fn handle_list_agents(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AgentSearchQuery>,
) -> Result<Json<Vec<AgentSummary>>, AppError> {
    let agents = sqlx::query_as::<_, AgentSummary>(
        r#"
        SELECT a.id, a.name, a.status, a.template_id,
               t.name AS template_name, t.key AS template_key, t.description, t.badge
        FROM agents a
        LEFT JOIN agent_templates t ON a.template_id = t.id
        WHERE a.company_id = $1
          AND ($2::text IS NULL OR a.name ILIKE $2 OR t.name ILIKE $2)
        ORDER BY a.name
        "#,
    )
    .bind(user.company_id())
    .bind(query.pattern())
    .fetch_all(&state.db)
    .await?;
    Ok(Json(agents))
}

/// GET /api/v1/agents/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<AgentTemplateRow>>, AppError> {
    let templates = sqlx::query_as::<_, AgentTemplateRow>(
        "SELECT id, key, name, description, badge FROM agent_templates ORDER BY name",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(templates))
}

/// POST /api/v1/agents
pub async fn handle_create_agent(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<AgentRow>), AppError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Agent name required".to_string()))?;

    let agent = sqlx::query_as::<_, AgentRow>(
        r#"
        INSERT INTO agents (company_id, template_id, name, status)
        VALUES ($1, $2, $3, 'ACTIVE')
        RETURNING id, company_id, template_id, name, status, created_at
        "#,
    )
    .bind(user.company_id())
    .bind(req.template_id)
    .bind(name)
    .fetch_one(&state.db)
    .await?;

    info!("Created agent {} for company {}", agent.id, agent.company_id);
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /api/v1/agents/:id
pub async fn handle_get_agent(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentSummary>, AppError> {
    sqlx::query_as::<_, AgentSummary>(
        r#"
        SELECT a.id, a.name, a.status, a.template_id,
               t.name AS template_name, t.key AS template_key, t.description, t.badge
        FROM agents a
        LEFT JOIN agent_templates t ON a.template_id = t.id
        WHERE a.id = $1 AND a.company_id = $2
        "#,
    )
    .bind(id)
    .bind(user.company_id())
    .fetch_optional(&state.db)
    .await?
    .map(Json)
    .ok_or_else(|| AppError::NotFound("Agent not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern() {
        let query = AgentSearchQuery {
            q: Some("  payroll ".into()),
        };
        assert_eq!(query.pattern().as_deref(), Some("%payroll%"));
        assert_eq!(AgentSearchQuery { q: Some("  ".into()) }.pattern(), None);
        assert_eq!(AgentSearchQuery::default().pattern(), None);
    }
}
