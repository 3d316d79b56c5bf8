//! Axum route handlers for registration, login and token refresh.
//!
//! The access token is returned in the body. The refresh token travels only in
//! an http-only `refreshToken` cookie.

use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{find_user, issue_token, verify_token, AuthUser};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::user::{User, UserCredentials};
use crate::models::MessageResponse;
use crate::state::AppState;

pub const REFRESH_COOKIE: &str = "refreshToken";
const REFRESH_COOKIE_MAX_AGE_DAYS: i64 = 7;
const BCRYPT_COST: u32 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Present and non-empty.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
///
/// New accounts join the first company as consultants.
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let (Some(name), Some(email), Some(password)) = (
        required(req.name),
        required(req.email),
        required(req.password),
    ) else {
        return Err(AppError::Validation(
            "Name, email and password required".to_string(),
        ));
    };

    let password_hash = hash_password(password, BCRYPT_COST).await?;

    let company_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM companies LIMIT 1")
        .fetch_optional(&state.db)
        .await?;
    let company_id = company_id
        .ok_or_else(|| anyhow::anyhow!("No company configured; seed the companies table"))?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (company_id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, 'CONSULTANT')
        RETURNING id, company_id, name, email, role
        "#,
    )
    .bind(company_id)
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Validation("Email already registered".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Registered user {} in company {}", user.id, user.company_id);
    let (jar, body) = sign_in(jar, &state.config, user)?;
    Ok((StatusCode::CREATED, jar, body))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(AppError::Validation("Email and password required".to_string()));
    };

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let credentials = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, company_id, name, email, role, password_hash FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(invalid)?;

    let hash = credentials.password_hash.ok_or_else(invalid)?;
    if !verify_password(password, hash).await? {
        return Err(invalid());
    }

    info!("User {} logged in", credentials.user.id);
    sign_in(jar, &state.config, credentials.user)
}

/// POST /api/v1/auth/refresh
///
/// Trades the refresh cookie for a new access token and rotates the cookie.
pub async fn handle_refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Refresh token required".to_string()))?;

    let claims = verify_token(&token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let user = find_user(&state.db, claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    sign_in(jar, &state.config, user)
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    // an explicit expired cookie, so it is cleared even if the request sent none
    let mut expired = Cookie::build((REFRESH_COOKIE, "")).path("/").build();
    expired.make_removal();
    let jar = jar.add(expired);
    (jar, Json(MessageResponse { message: "Logged out" }))
}

/// GET /api/v1/auth/me
pub async fn handle_me(user: AuthUser) -> Json<User> {
    Json(user.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Issues both tokens for `user`, setting the refresh cookie on `jar`.
fn sign_in(
    jar: CookieJar,
    config: &Config,
    user: User,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let access_token = issue_token(user.id, config.jwt_access_ttl_secs, &config.jwt_secret)?;
    let refresh_token = issue_token(user.id, config.jwt_refresh_ttl_secs, &config.jwt_secret)?;
    let jar = jar.add(refresh_cookie(refresh_token, config.cookie_secure));
    Ok((jar, Json(AuthResponse { user, access_token })))
}

pub fn refresh_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::days(REFRESH_COOKIE_MAX_AGE_DAYS))
        .build()
}

/// Hashes on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")?;
    Ok(hash)
}

/// Accepts `$2a$`/`$2b$` hashes. A malformed stored hash never matches.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let result = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?;
    Ok(result.unwrap_or_else(|e| {
        warn!("Stored password hash could not be checked: {e}");
        false
    }))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
