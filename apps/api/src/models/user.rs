use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A consultant account. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A user row together with the stored bcrypt hash, for login only.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: Option<String>,
}
