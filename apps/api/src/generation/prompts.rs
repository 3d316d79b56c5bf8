// All LLM prompt constants for JD generation.
// Blank inputs are rendered with llm_client::prompts::NOT_SPECIFIED.

/// System prompt for JD generation.
pub const JD_GENERATION_SYSTEM: &str = "You are an expert HR consultant writing \
    professional, consulting-grade job descriptions for client deliverables. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Bucket guidance for the Balanced Scorecard template.
pub const BSC_TEMPLATE_DESCRIPTION: &str = "Balanced Scorecard (BSC) format: organize \
    responsibilities into buckets such as Financial, Customer, Internal Processes, \
    Learning & Growth.";

/// Bucket guidance for the standard template.
pub const STANDARD_TEMPLATE_DESCRIPTION: &str = "Standard format: organize responsibilities \
    by functional area or typical JD structure.";

/// JD generation prompt template.
/// Replace: {job_title}, {reports_to}, {job_family}, {level}, {role_summary},
///          {template_type}, {include_percentages}, {template_description}
pub const JD_GENERATION_PROMPT_TEMPLATE: &str = r#"Generate a professional, consulting-grade job description.

Inputs:
- Job Title: {job_title}
- Reports To: {reports_to}
- Job Family: {job_family}
- Level: {level}
- Role Summary: {role_summary}
- Template Type: {template_type}
- Include % Contribution: {include_percentages}

Requirements:
- Follow {template_description}
- Create 5-8 responsibilities, each as a complete sentence starting with a strong action verb.
- Create 3-5 KPIs that are measurable and relevant.
- Create 3-5 technical competencies and 3-5 behavioral competencies.
- Output valid JSON only, no markdown or extra text.

Output format:
{
  "job_title": "string",
  "reports_to": "string",
  "department": "string",
  "job_family": "string",
  "level": "string",
  "role_summary": "string",
  "responsibilities": {
    "bucketName1": ["item1", "item2"],
    "bucketName2": ["item1"]
  },
  "kpis": ["kpi1", "kpi2"],
  "competencies": {
    "technical": ["c1", "c2"],
    "behavioral": ["c1", "c2"]
  }
}"#;
