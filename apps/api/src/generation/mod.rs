// JD generation: LLM drafting plus the verb-rule pass applied to every
// generated document before it is stored or returned.
// All LLM calls go through llm_client; no direct OpenAI calls here.

pub mod jd_generator;
pub mod prompts;
pub mod verb_rules;
