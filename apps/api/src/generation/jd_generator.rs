//! JD Generator: pluggable, trait-based drafting of job descriptions.
//!
//! Default: `OpenAiJdGenerator` (chat completion via `llm_client`).
//! Whatever the backend returns is passed through the verb rules before the
//! caller sees it; see [`generate_with_verb_rules`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    BSC_TEMPLATE_DESCRIPTION, JD_GENERATION_PROMPT_TEMPLATE, JD_GENERATION_SYSTEM,
    STANDARD_TEMPLATE_DESCRIPTION,
};
use crate::generation::verb_rules::enforce_document;
use crate::llm_client::prompts::NOT_SPECIFIED;
use crate::llm_client::{ChatMessage, LlmClient, LlmError};
use crate::models::draft::{JdDraftRow, TemplateType};
use crate::models::jd::JdDocument;

const GENERATION_TEMPERATURE: f32 = 0.7;

/// Everything the generator is told about the role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationInputs {
    pub job_title: Option<String>,
    pub reports_to: Option<String>,
    pub job_family: Option<String>,
    pub level: Option<String>,
    pub role_summary: Option<String>,
    #[serde(default)]
    pub template_type: TemplateType,
    #[serde(default)]
    pub include_percentages: bool,
}

impl From<&JdDraftRow> for GenerationInputs {
    fn from(draft: &JdDraftRow) -> Self {
        Self {
            job_title: draft.job_title.clone(),
            reports_to: draft.reports_to.clone(),
            job_family: draft.job_family.clone(),
            level: draft.level.clone(),
            role_summary: draft.role_summary.clone(),
            template_type: TemplateType::from_column(&draft.template_type),
            include_percentages: draft.include_percentages,
        }
    }
}

/// The JD generator trait. Implement this to swap backends without touching
/// the endpoint, handler, or caller code.
///
/// Carried in `AppState` as `Arc<dyn JdGenerator>`.
#[async_trait]
pub trait JdGenerator: Send + Sync {
    async fn generate(&self, inputs: &GenerationInputs) -> Result<JdDocument, AppError>;
}

pub struct OpenAiJdGenerator(pub LlmClient);

#[async_trait]
impl JdGenerator for OpenAiJdGenerator {
    async fn generate(&self, inputs: &GenerationInputs) -> Result<JdDocument, AppError> {
        let messages = [
            ChatMessage::system(JD_GENERATION_SYSTEM),
            ChatMessage::user(build_generation_prompt(inputs)),
        ];
        self.0
            .chat_json::<JdDocument>(&messages, GENERATION_TEMPERATURE)
            .await
            .map_err(|e| match e {
                LlmError::NotConfigured => AppError::LlmNotConfigured,
                other => AppError::Llm(format!("JD generation failed: {other}")),
            })
    }
}

/// Generates a JD and applies the verb rules for the requested level.
pub async fn generate_with_verb_rules(
    generator: &dyn JdGenerator,
    inputs: &GenerationInputs,
) -> Result<JdDocument, AppError> {
    info!(
        "Generating JD for {:?} at level {:?} ({})",
        inputs.job_title,
        inputs.level,
        inputs.template_type.as_str()
    );
    let generated = generator.generate(inputs).await?;
    Ok(enforce_document(&generated, inputs.level.as_deref()).into_owned())
}

/// Fills the generation template from the inputs.
pub fn build_generation_prompt(inputs: &GenerationInputs) -> String {
    fn or_unspecified(value: &Option<String>) -> &str {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(NOT_SPECIFIED)
    }

    let template_description = match inputs.template_type {
        TemplateType::Bsc => BSC_TEMPLATE_DESCRIPTION,
        TemplateType::Standard => STANDARD_TEMPLATE_DESCRIPTION,
    };

    JD_GENERATION_PROMPT_TEMPLATE
        .replace("{job_title}", or_unspecified(&inputs.job_title))
        .replace("{reports_to}", or_unspecified(&inputs.reports_to))
        .replace("{job_family}", or_unspecified(&inputs.job_family))
        .replace("{level}", or_unspecified(&inputs.level))
        .replace("{role_summary}", or_unspecified(&inputs.role_summary))
        .replace("{template_type}", inputs.template_type.as_str())
        .replace(
            "{include_percentages}",
            if inputs.include_percentages { "Yes" } else { "No" },
        )
        .replace("{template_description}", template_description)
}
