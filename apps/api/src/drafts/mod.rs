// JD drafts: create, edit, generate, version and submit job descriptions.
// Generation goes through generation::jd_generator, which applies the verb rules.

pub mod handlers;
pub mod store;
