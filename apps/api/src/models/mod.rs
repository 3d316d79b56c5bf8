pub mod agent;
pub mod connection;
pub mod draft;
pub mod file;
pub mod jd;
pub mod user;

use serde::Serialize;

/// `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
