use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    pub auth_rate_limit_max: u32,
    pub auth_rate_limit_window_secs: u64,

    // Outbound mail. Without an API URL messages are only logged.
    pub mail_api_url: Option<String>,
    pub mail_api_key: String,
    pub mail_from: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 20)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            // Comma-separated, e.g. LAN addresses used during development
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_ttl_secs: parse_var("JWT_TTL_SECS", 604_800)?,

            auth_rate_limit_max: parse_var("AUTH_RATE_LIMIT_MAX", 5)?,
            auth_rate_limit_window_secs: parse_var("AUTH_RATE_LIMIT_WINDOW_SECS", 60)?,

            mail_api_url: env::var("MAIL_API_URL").ok().filter(|s| !s.is_empty()),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "\"Health Tracker\" <no-reply@healthtrack.local>".into()),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/healthtrack_test".into(),
            database_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: "test-secret".into(),
            jwt_ttl_secs: 3600,
            auth_rate_limit_max: 5,
            auth_rate_limit_window_secs: 60,
            mail_api_url: None,
            mail_api_key: String::new(),
            mail_from: "\"Health Tracker\" <no-reply@healthtrack.local>".into(),
        }
    }
}
