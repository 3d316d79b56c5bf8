// HR co-pilot chat. Single request/response, no streaming.

pub mod handlers;
pub mod prompts;
