use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::jd::JdDocument;

/// Review state of a JD draft. Stored as upper-case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    Draft,
    InReview,
    Approved,
    Archived,
}

impl DraftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftStatus::Draft => "DRAFT",
            DraftStatus::InReview => "IN_REVIEW",
            DraftStatus::Approved => "APPROVED",
            DraftStatus::Archived => "ARCHIVED",
        }
    }
}

/// Layout the generator is asked to follow for responsibility buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateType {
    #[default]
    Standard,
    /// Balanced Scorecard.
    Bsc,
}

impl TemplateType {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::Standard => "STANDARD",
            TemplateType::Bsc => "BSC",
        }
    }

    /// Reads the stored column. Anything unrecognised is treated as standard.
    pub fn from_column(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("BSC") {
            TemplateType::Bsc
        } else {
            TemplateType::Standard
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JdDraftRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub created_by: Uuid,
    pub agent_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub reports_to: Option<String>,
    pub job_family: Option<String>,
    pub level: Option<String>,
    pub template_type: String,
    pub include_percentages: bool,
    pub role_summary: Option<String>,
    pub raw_responsibilities: Option<String>,
    pub status: String,
    pub generated_jd_json: Option<Json<JdDocument>>,
    pub current_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/jd/drafts`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateDraftRequest {
    pub agent_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub reports_to: Option<String>,
    pub job_family: Option<String>,
    pub level: Option<String>,
    pub template_type: Option<TemplateType>,
    pub include_percentages: Option<bool>,
    pub role_summary: Option<String>,
    pub raw_responsibilities: Option<String>,
}

/// Body of `PATCH /api/v1/jd/drafts/:id`. Absent (or null) fields are left as
/// they are.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDraftRequest {
    pub status: Option<DraftStatus>,
    pub job_title: Option<String>,
    pub reports_to: Option<String>,
    pub job_family: Option<String>,
    pub level: Option<String>,
    pub template_type: Option<TemplateType>,
    pub include_percentages: Option<bool>,
    pub role_summary: Option<String>,
    pub generated_jd_json: Option<JdDocument>,
}

impl UpdateDraftRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.job_title.is_none()
            && self.reports_to.is_none()
            && self.job_family.is_none()
            && self.level.is_none()
            && self.template_type.is_none()
            && self.include_percentages.is_none()
            && self.role_summary.is_none()
            && self.generated_jd_json.is_none()
    }
}

/// Draft list entry with the owning agent's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DraftListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub draft: JdDraftRow,
    pub agent_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JdVersionRow {
    pub id: Uuid,
    pub jd_draft_id: Uuid,
    pub version: i32,
    pub generated_jd_json: Json<JdDocument>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_deserialization() {
        let req: CreateDraftRequest = serde_json::from_value(json!({
            "job_title": "HR Analyst",
            "level": "Analyst",
            "template_type": "BSC",
            "include_percentages": true
        }))
        .unwrap();
        assert_eq!(req.template_type, Some(TemplateType::Bsc));
        assert_eq!(req.include_percentages, Some(true));
        assert!(req.agent_id.is_none());
    }

    #[test]
    fn test_update_request_empty_detection() {
        let empty: UpdateDraftRequest = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());

        let nulls: UpdateDraftRequest =
            serde_json::from_value(json!({"job_title": null})).unwrap();
        assert!(nulls.is_empty());

        let status: UpdateDraftRequest =
            serde_json::from_value(json!({"status": "APPROVED"})).unwrap();
        assert!(!status.is_empty());
        assert_eq!(status.status, Some(DraftStatus::Approved));
    }

    #[test]
    fn test_update_request_rejects_unknown_status() {
        let result: Result<UpdateDraftRequest, _> =
            serde_json::from_value(json!({"status": "SHIPPED"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_accepts_generated_document() {
        let patch: UpdateDraftRequest = serde_json::from_value(json!({
            "generated_jd_json": {
                "job_title": "HR Analyst",
                "responsibilities": {"Reporting": ["Prepares dashboards"]}
            }
        }))
        .unwrap();
        assert!(!patch.is_empty());
        assert_eq!(
            patch.generated_jd_json.unwrap().job_title.as_deref(),
            Some("HR Analyst")
        );
    }

    #[test]
    fn test_draft_status_serde() {
        let status: DraftStatus = serde_json::from_str(r#""IN_REVIEW""#).unwrap();
        assert_eq!(status, DraftStatus::InReview);
        assert_eq!(status.as_str(), "IN_REVIEW");
        assert_eq!(
            serde_json::to_string(&DraftStatus::Approved).unwrap(),
            r#""APPROVED""#
        );
    }

    #[test]
    fn test_unknown_draft_status_rejected() {
        let result: Result<DraftStatus, _> = serde_json::from_str(r#""PUBLISHED""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_type_from_column() {
        assert_eq!(TemplateType::from_column("BSC"), TemplateType::Bsc);
        assert_eq!(TemplateType::from_column(" bsc "), TemplateType::Bsc);
        assert_eq!(TemplateType::from_column("STANDARD"), TemplateType::Standard);
        assert_eq!(TemplateType::from_column(""), TemplateType::Standard);
    }

    #[test]
    fn test_template_type_default_is_standard() {
        assert_eq!(TemplateType::default().as_str(), "STANDARD");
        let t: TemplateType = serde_json::from_str(r#""BSC""#).unwrap();
        assert_eq!(t, TemplateType::Bsc);
    }
}
