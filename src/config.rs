use std::env;

use crate::error::AppError;

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

pub struct Config {
    /// Postgres connection string. When unset the process runs on the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// Key that signs session tokens.
    pub session_secret: String,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| AppError::InternalServerError("SESSION_SECRET must be set".into()))?;
        if session_secret.is_empty() {
            return Err(AppError::InternalServerError(
                "SESSION_SECRET must not be empty".into(),
            ));
        }

        let session_ttl_hours = parse_var("SESSION_TTL_HOURS", 24)?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(AppError::InternalServerError(format!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            )));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            server_port: parse_var("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            session_secret,
            session_ttl_hours,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} must be a number", name))),
        Err(_) => Ok(default),
    }
}
