use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub yapily_application_uuid: String,
    pub yapily_application_secret: String,
    pub yapily_base_url: String,
    pub yapily_timeout_secs: u64,
    pub default_lookback_days: i64,
    pub sync_interval_hours: u64,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| AppError::Config("DATABASE_URL must be set".to_string()))?,
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            yapily_application_uuid: std::env::var("YAPILY_APPLICATION_UUID")
                .map_err(|_| AppError::Config("YAPILY_APPLICATION_UUID is required".to_string()))?,
            yapily_application_secret: std::env::var("YAPILY_APPLICATION_SECRET")
                .map_err(|_| AppError::Config("YAPILY_APPLICATION_SECRET is required".to_string()))?,
            yapily_base_url: std::env::var("YAPILY_BASE_URL")
                .unwrap_or_else(|_| "https://api.yapily.com".to_string()),
            yapily_timeout_secs: parse_env_or("YAPILY_TIMEOUT_SECS", 15),
            default_lookback_days: parse_env_or(
                "SYNC_LOOKBACK_DAYS",
                crate::sync::DEFAULT_LOOKBACK_DAYS,
            ),
            sync_interval_hours: parse_env_or("SYNC_INTERVAL_HOURS", 6),
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
