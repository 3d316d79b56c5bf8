//! SQL for the JD draft lifecycle. Every query is scoped to the caller's company.
//!
//! Version numbers are only ever incremented by the database
//! (`current_version = current_version + 1`), so concurrent generate or
//! save-version calls cannot hand out the same number twice.

use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::draft::{
    CreateDraftRequest, DraftListItem, DraftStatus, JdDraftRow, JdVersionRow, UpdateDraftRequest,
};
use crate::models::jd::JdDocument;

const STORE_GENERATED_SQL: &str = r#"
        UPDATE jd_drafts
        SET generated_jd_json = $1, current_version = current_version + 1, updated_at = NOW()
        WHERE id = $2 AND company_id = $3
        RETURNING *
        "#;

const BUMP_VERSION_SQL: &str = r#"
        UPDATE jd_drafts
        SET current_version = current_version + 1, updated_at = NOW()
        WHERE id = $1 AND company_id = $2
        RETURNING *
        "#;

pub async fn create_draft(
    pool: &PgPool,
    company_id: Uuid,
    created_by: Uuid,
    req: &CreateDraftRequest,
) -> Result<JdDraftRow, sqlx::Error> {
    sqlx::query_as::<_, JdDraftRow>(
        r#"
        INSERT INTO jd_drafts
            (company_id, created_by, agent_id, job_title, reports_to, job_family, level,
             template_type, include_percentages, role_summary, raw_responsibilities, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(created_by)
    .bind(req.agent_id)
    .bind(empty_as_null(&req.job_title))
    .bind(empty_as_null(&req.reports_to))
    .bind(empty_as_null(&req.job_family))
    .bind(empty_as_null(&req.level))
    .bind(req.template_type.unwrap_or_default().as_str())
    .bind(req.include_percentages.unwrap_or(false))
    .bind(empty_as_null(&req.role_summary))
    .bind(empty_as_null(&req.raw_responsibilities))
    .bind(DraftStatus::Draft.as_str())
    .fetch_one(pool)
    .await
}

/// Newest first, with the owning agent's name.
pub async fn list_drafts(pool: &PgPool, company_id: Uuid) -> Result<Vec<DraftListItem>, sqlx::Error> {
    sqlx::query_as::<_, DraftListItem>(
        r#"
        SELECT j.*, a.name AS agent_name
        FROM jd_drafts j
        LEFT JOIN agents a ON j.agent_id = a.id
        WHERE j.company_id = $1
        ORDER BY j.updated_at DESC
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn get_draft(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
) -> Result<Option<JdDraftRow>, sqlx::Error> {
    sqlx::query_as::<_, JdDraftRow>("SELECT * FROM jd_drafts WHERE id = $1 AND company_id = $2")
        .bind(id)
        .bind(company_id)
        .fetch_optional(pool)
        .await
}

/// Applies the fields present in `patch`. The caller handles an empty patch.
pub async fn update_draft(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
    patch: &UpdateDraftRequest,
) -> Result<Option<JdDraftRow>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE jd_drafts SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(status) = patch.status {
            set.push("status = ").push_bind_unseparated(status.as_str());
        }
        if let Some(job_title) = &patch.job_title {
            set.push("job_title = ").push_bind_unseparated(job_title.clone());
        }
        if let Some(reports_to) = &patch.reports_to {
            set.push("reports_to = ").push_bind_unseparated(reports_to.clone());
        }
        if let Some(job_family) = &patch.job_family {
            set.push("job_family = ").push_bind_unseparated(job_family.clone());
        }
        if let Some(level) = &patch.level {
            set.push("level = ").push_bind_unseparated(level.clone());
        }
        if let Some(template_type) = patch.template_type {
            set.push("template_type = ")
                .push_bind_unseparated(template_type.as_str());
        }
        if let Some(include) = patch.include_percentages {
            set.push("include_percentages = ").push_bind_unseparated(include);
        }
        if let Some(role_summary) = &patch.role_summary {
            set.push("role_summary = ").push_bind_unseparated(role_summary.clone());
        }
        if let Some(document) = &patch.generated_jd_json {
            set.push("generated_jd_json = ")
                .push_bind_unseparated(Json(document.clone()));
        }
        set.push("updated_at = NOW()");
    }
    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(" AND company_id = ")
        .push_bind(company_id)
        .push(" RETURNING *");

    qb.build_query_as::<JdDraftRow>().fetch_optional(pool).await
}

/// Stores a freshly generated document and bumps the version counter.
/// `None` if the draft disappeared while generating.
pub async fn store_generated(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
    document: &JdDocument,
) -> Result<Option<JdDraftRow>, sqlx::Error> {
    sqlx::query_as::<_, JdDraftRow>(STORE_GENERATED_SQL)
        .bind(Json(document))
        .bind(id)
        .bind(company_id)
        .fetch_optional(pool)
        .await
}

/// Bumps the version and snapshots the generated document into `jd_versions`
/// in one transaction. The snapshot is taken from the row the bump returned,
/// which the update keeps locked until commit. A draft that was never
/// generated is snapshotted as `{}`.
pub async fn save_version(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
    created_by: Uuid,
) -> Result<Option<JdDraftRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(draft) = sqlx::query_as::<_, JdDraftRow>(BUMP_VERSION_SQL)
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    let snapshot = draft
        .generated_jd_json
        .as_ref()
        .map(|doc| doc.0.clone())
        .unwrap_or_default();

    sqlx::query(
        r#"
        INSERT INTO jd_versions (jd_draft_id, version, generated_jd_json, created_by)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(draft.id)
    .bind(draft.current_version)
    .bind(Json(&snapshot))
    .bind(created_by)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(draft))
}

pub async fn list_versions(
    pool: &PgPool,
    draft_id: Uuid,
) -> Result<Vec<JdVersionRow>, sqlx::Error> {
    sqlx::query_as::<_, JdVersionRow>(
        "SELECT * FROM jd_versions WHERE jd_draft_id = $1 ORDER BY version DESC",
    )
    .bind(draft_id)
    .fetch_all(pool)
    .await
}

pub async fn submit_for_review(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
) -> Result<Option<JdDraftRow>, sqlx::Error> {
    sqlx::query_as::<_, JdDraftRow>(
        r#"
        UPDATE jd_drafts SET status = $1, updated_at = NOW()
        WHERE id = $2 AND company_id = $3
        RETURNING *
        "#,
    )
    .bind(DraftStatus::InReview.as_str())
    .bind(id)
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

/// Empty form fields are stored as NULL; anything else verbatim.
fn empty_as_null(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
