use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime. The default is 24 days.
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 24;
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Parses `TOKEN_TTL_HOURS`; unset means the default, anything outside
/// `1..=MAX_TOKEN_TTL_HOURS` is rejected.
pub fn token_ttl_hours(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOKEN_TTL_HOURS);
    };
    let hours: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("TOKEN_TTL_HOURS is not an integer: {raw:?}"))?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        bail!("TOKEN_TTL_HOURS must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {hours}");
    }
    Ok(hours)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "adboard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "adboard-users".into()),
            ttl_hours: token_ttl_hours(std::env::var("TOKEN_TTL_HOURS").ok().as_deref())?,
        };
        Ok(Self {
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            jwt,
        })
    }
}
