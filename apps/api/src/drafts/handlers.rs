//! Axum route handlers for the JD draft API.

use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::drafts::store;
use crate::errors::AppError;
use crate::generation::jd_generator::{generate_with_verb_rules, GenerationInputs};
use crate::generation::verb_rules::{enforce_verb_rules, resolve_tier, VerbTier};
use crate::export::{self, EXCEL_CONTENT_TYPE, PDF_CONTENT_TYPE};
use crate::models::draft::{
    CreateDraftRequest, DraftListItem, JdDraftRow, JdVersionRow, UpdateDraftRequest,
};
use crate::models::jd::JdDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EnforceRequest {
    pub document: Option<JdDocument>,
    pub level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnforceResponse {
    pub document: Option<JdDocument>,
    /// `None` when the level matched no tier and the document was left as-is.
    pub tier: Option<VerbTier>,
    pub vocabulary: Option<&'static [&'static str]>,
}

fn draft_not_found() -> AppError {
    AppError::NotFound("Draft not found".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jd/drafts
pub async fn handle_create_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateDraftRequest>,
) -> Result<(StatusCode, Json<JdDraftRow>), AppError> {
    let draft = store::create_draft(&state.db, user.company_id(), user.id(), &req).await?;
    info!("Created JD draft {} for company {}", draft.id, draft.company_id);
    Ok((StatusCode::CREATED, Json(draft)))
}

/// GET /api/v1/jd/drafts
pub async fn handle_list_drafts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<DraftListItem>>, AppError> {
    Ok(Json(store::list_drafts(&state.db, user.company_id()).await?))
}

/// GET /api/v1/jd/drafts/:id
pub async fn handle_get_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JdDraftRow>, AppError> {
    store::get_draft(&state.db, id, user.company_id())
        .await?
        .map(Json)
        .ok_or_else(draft_not_found)
}

/// PATCH /api/v1/jd/drafts/:id
///
/// An empty patch returns the draft unchanged.
pub async fn handle_update_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateDraftRequest>,
) -> Result<Json<JdDraftRow>, AppError> {
    let updated = if patch.is_empty() {
        store::get_draft(&state.db, id, user.company_id()).await?
    } else {
        store::update_draft(&state.db, id, user.company_id(), &patch).await?
    };
    updated.map(Json).ok_or_else(draft_not_found)
}

/// POST /api/v1/jd/drafts/:id/generate
///
/// Generates a JD from the draft's inputs, applies the verb rules for the
/// draft's level, stores the result and bumps `current_version`.
pub async fn handle_generate_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JdDraftRow>, AppError> {
    let draft = store::get_draft(&state.db, id, user.company_id())
        .await?
        .ok_or_else(draft_not_found)?;

    let inputs = GenerationInputs::from(&draft);
    let document = generate_with_verb_rules(state.jd_generator.as_ref(), &inputs).await?;

    let updated = store::store_generated(&state.db, draft.id, draft.company_id, &document)
        .await?
        .ok_or_else(draft_not_found)?;
    info!(
        "Generated JD for draft {} (version {})",
        updated.id, updated.current_version
    );
    Ok(Json(updated))
}

/// POST /api/v1/jd/drafts/:id/save-version
pub async fn handle_save_version(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JdDraftRow>, AppError> {
    let updated = store::save_version(&state.db, id, user.company_id(), user.id())
        .await?
        .ok_or_else(draft_not_found)?;
    info!("Saved version {} of draft {}", updated.current_version, updated.id);
    Ok(Json(updated))
}

/// GET /api/v1/jd/drafts/:id/versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<JdVersionRow>>, AppError> {
    let draft = store::get_draft(&state.db, id, user.company_id())
        .await?
        .ok_or_else(draft_not_found)?;
    Ok(Json(store::list_versions(&state.db, draft.id).await?))
}

/// POST /api/v1/jd/drafts/:id/submit-review
pub async fn handle_submit_for_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JdDraftRow>, AppError> {
    store::submit_for_review(&state.db, id, user.company_id())
        .await?
        .map(Json)
        .ok_or_else(draft_not_found)
}

/// GET /api/v1/jd/drafts/:id/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let document = exportable_document(&state, &user, id).await?;
    let bytes = export::pdf::render_pdf(&document)?;
    info!("Exported draft {id} as PDF ({} bytes)", bytes.len());
    Ok(attachment(
        PDF_CONTENT_TYPE,
        export::export_filename(&document, "pdf"),
        bytes,
    ))
}

/// GET /api/v1/jd/drafts/:id/export/excel
pub async fn handle_export_excel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let document = exportable_document(&state, &user, id).await?;
    let bytes = export::excel::render_workbook(&document)?;
    info!("Exported draft {id} as Excel ({} bytes)", bytes.len());
    Ok(attachment(
        EXCEL_CONTENT_TYPE,
        export::export_filename(&document, "xlsx"),
        bytes,
    ))
}

async fn exportable_document(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> Result<JdDocument, AppError> {
    let draft = store::get_draft(&state.db, id, user.company_id())
        .await?
        .ok_or_else(draft_not_found)?;
    draft
        .generated_jd_json
        .map(|doc| doc.0)
        .ok_or_else(|| AppError::Validation("No generated JD to export".to_string()))
}

fn attachment(content_type: &str, filename: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// POST /api/v1/jd/enforce
///
/// Runs the verb rules over a caller-supplied document without storing it.
pub async fn handle_enforce(Json(req): Json<EnforceRequest>) -> Json<EnforceResponse> {
    let level = req.level.as_deref();
    let tier = resolve_tier(level);
    let document = enforce_verb_rules(req.document.as_ref(), level).map(Cow::into_owned);

    Json(EnforceResponse {
        document,
        tier,
        vocabulary: tier.map(VerbTier::vocabulary),
    })
}
