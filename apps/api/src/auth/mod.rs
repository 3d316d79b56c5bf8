//! Bearer-token authentication.
//!
//! Access and refresh tokens are both HS256 JWTs carrying a `userId` claim and
//! signed with the same secret; only their lifetimes differ. The user is
//! re-read from the database on every request so that role and company
//! changes apply immediately.

pub mod handlers;

use anyhow::Context;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

/// The authenticated caller. Every tenant-scoped query uses `company_id`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn company_id(&self) -> Uuid {
        self.0.company_id
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Signs a token for `user_id` that expires `ttl_secs` from now.
pub fn issue_token(user_id: Uuid, ttl_secs: u64, secret: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp().max(0) as usize;
    let claims = Claims {
        user_id,
        exp: now + ttl_secs as usize,
        iat: Some(now),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("failed to sign token")?;
    Ok(token)
}

/// Verifies the signature and expiry of an access token.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".to_string()),
        _ => {
            debug!("Rejected access token: {e}");
            AppError::Unauthorized("Invalid token".to_string())
        }
    })
}

pub async fn find_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, company_id, name, email, role FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

        let claims = verify_token(token, &state.config.jwt_secret)?;

        let user = find_user(&state.db, claims.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(AuthUser(user))
    }
}
