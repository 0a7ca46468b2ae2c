
use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::extraction;
use crate::types::UserId;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKER_LIMIT: usize = 8;
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

const MEMORY_DATABASE: &str = "memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0}, set it in .env or as an environment variable")]
    Missing(&'static str),
    #[error("Invalid {key} [{value}]: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String
    }
}

/// Where expenses are kept.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DatabaseLocation {
    Sqlite(PathBuf),
    /// Lost on restart; intended for local experiments.
    Memory
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub authorized_user: UserId,
    pub database: DatabaseLocation,
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub port: u16,
    pub public_url: Option<String>,
    pub log_level: Option<String>,
    pub worker_limit: usize,
    pub queue_capacity: usize,
    /// Fallbacks applied while loading, logged once logging is set up.
    pub notices: Vec<String>
}

impl Config {
    /// Reads the process environment after loading `.env` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let bot_token = required("TELEGRAM_BOT_TOKEN")?;

        let user_id = required("TELEGRAM_USER_ID")?;
        let authorized_user = user_id.parse::<UserId>().map_err(|error| ConfigError::Invalid {
            key: "TELEGRAM_USER_ID",
            value: user_id.clone(),
            reason: error.to_string()
        })?;

        let database = parse_database(&required("DATABASE_URL")?);
        let openrouter_api_key = required("OPENROUTER_API_KEY")?;

        let mut notices = Vec::new();

        let port = match optional("PORT") {
            Some(value) => value.parse().unwrap_or_else(|_| {
                notices.push(format!("Invalid PORT [{value}], defaulting to {DEFAULT_PORT}"));
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT
        };

        Ok(Self {
            bot_token,
            authorized_user,
            database,
            openrouter_api_key,
            openrouter_model: optional("OPENROUTER_MODEL").unwrap_or_else(|| extraction::DEFAULT_MODEL.to_string()),
            openrouter_base_url: optional("OPENROUTER_BASE_URL").unwrap_or_else(|| extraction::DEFAULT_BASE_URL.to_string()),
            port,
            public_url: optional("PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
            log_level: optional("LOG_LEVEL"),
            worker_limit: parse_positive(optional("WORKER_LIMIT"), "WORKER_LIMIT", DEFAULT_WORKER_LIMIT)?,
            queue_capacity: parse_positive(optional("QUEUE_CAPACITY"), "QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?,
            notices
        })
    }
}

fn parse_database(url: &str) -> DatabaseLocation {
    if url == MEMORY_DATABASE {
        return DatabaseLocation::Memory
    }

    let path = url.strip_prefix("sqlite://").unwrap_or(url);
    DatabaseLocation::Sqlite(PathBuf::from(path))
}

fn parse_positive(value: Option<String>, key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(default)
    };

    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        Ok(_) => Err(ConfigError::Invalid { key, value, reason: "must be greater than zero".to_string() }),
        Err(error) => Err(ConfigError::Invalid { key, value, reason: error.to_string() })
    }
}
