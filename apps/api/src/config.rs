use anyhow::{bail, Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_access_ttl_secs: u64,
    pub jwt_refresh_ttl_secs: u64,
    /// Marks the refresh cookie `Secure`. On in production only.
    pub cookie_secure: bool,
    /// Optional: without it the server runs, but AI endpoints return 503.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub frontend_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let app_env = optional_env("APP_ENV")
            .or_else(|| optional_env("NODE_ENV"))
            .unwrap_or_default();

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: env_or("JWT_SECRET", "dev-secret"),
            jwt_access_ttl_secs: parse_duration_secs(&env_or("JWT_ACCESS_EXPIRY", "15m"))
                .context("JWT_ACCESS_EXPIRY must be a duration such as 15m")?,
            jwt_refresh_ttl_secs: parse_duration_secs(&env_or("JWT_REFRESH_EXPIRY", "7d"))
                .context("JWT_REFRESH_EXPIRY must be a duration such as 7d")?,
            cookie_secure: app_env == "production",
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            frontend_url: optional_env("FRONTEND_URL"),
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Parses token lifetimes written as `"15m"`, `"7d"`, `"2 hours"` or `"1.5h"`.
/// A bare number is milliseconds, so `"900"` is under a second; write `"900s"`.
pub fn parse_duration_secs(value: &str) -> Result<u64> {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);
    let amount: f64 = amount
        .parse()
        .with_context(|| format!("invalid duration {value:?}"))?;

    let unit_secs = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 0.001,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600.0,
        "d" | "day" | "days" => 86_400.0,
        "w" | "week" | "weeks" => 604_800.0,
        "y" | "yr" | "yrs" | "year" | "years" => 31_557_600.0,
        other => bail!("unknown duration unit {other:?} in {value:?}"),
    };
    Ok((amount * unit_secs).floor() as u64)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
