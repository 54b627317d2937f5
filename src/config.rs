//! Process configuration read from the environment at startup

use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub channel_secret: String,
    pub channel_access_token: String,
    pub gourmet_api_key: String,
    pub gourmet_api_base_url: String,
    pub line_api_base_url: String,
    pub db_path: String,
    pub port: u16,
    /// Applies to both the catalog and the reply API
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let db_path = get("GOURMET_BOT_DB_PATH").unwrap_or_else(|| {
            let home = get("HOME").unwrap_or_else(|| "/tmp".to_string());
            format!("{home}/.gourmet-bot/gourmet.db")
        });

        let port = match get("GOURMET_BOT_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "GOURMET_BOT_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "HTTP_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            channel_secret: require("LINE_CHANNEL_SECRET")?,
            channel_access_token: require("LINE_CHANNEL_ACCESS_TOKEN")?,
            gourmet_api_key: require("RECRUIT_GOURMET_API_KEY")?,
            gourmet_api_base_url: get("GOURMET_API_BASE_URL")
                .unwrap_or_else(|| crate::catalog::DEFAULT_BASE_URL.to_string()),
            line_api_base_url: get("LINE_API_BASE_URL")
                .unwrap_or_else(|| crate::line::DEFAULT_BASE_URL.to_string()),
            db_path,
            port,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
