use std::path::PathBuf;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_BASE: u32 = 2;
const DEFAULT_BACKOFF_UNIT_MS: u64 = 1000;
const DEFAULT_BACKOFF_JITTER_MS: u64 = 250;
const DEFAULT_VOICE_AUDIT_CRON: &str = "*/30 * * * * *";
const DEFAULT_ERROR_LOG_PATH: &str = "error_log.txt";

pub struct Config {
    pub discord_bot_token: String,

    /// User that receives operational notifications by direct message.
    pub admin_user_id: Option<u64>,
    /// Guild to register slash commands in; commands are global when unset.
    pub guild_id: Option<u64>,

    pub max_reconnect_attempts: u32,
    pub backoff_base: u32,
    pub backoff_unit_ms: u64,
    pub backoff_jitter_ms: u64,

    pub voice_audit_cron: String,
    pub error_log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset so a blank line in `.env` falls back to
    /// the default instead of failing to parse.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let discord_bot_token = lookup("DISCORD_BOT_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?;

        let max_reconnect_attempts = parse_var(
            "STICKY_MAX_RECONNECT_ATTEMPTS",
            lookup("STICKY_MAX_RECONNECT_ATTEMPTS"),
            DEFAULT_MAX_RECONNECT_ATTEMPTS,
        )?;
        if max_reconnect_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar {
                name: "STICKY_MAX_RECONNECT_ATTEMPTS".to_string(),
                value: max_reconnect_attempts.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let backoff_base = parse_var(
            "STICKY_BACKOFF_BASE",
            lookup("STICKY_BACKOFF_BASE"),
            DEFAULT_BACKOFF_BASE,
        )?;
        if backoff_base == 0 {
            return Err(ConfigError::InvalidEnvVar {
                name: "STICKY_BACKOFF_BASE".to_string(),
                value: backoff_base.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            discord_bot_token,
            admin_user_id: parse_snowflake("ADMIN_USER_ID", lookup("ADMIN_USER_ID"))?,
            guild_id: parse_snowflake("GUILD_ID", lookup("GUILD_ID"))?,
            max_reconnect_attempts,
            backoff_base,
            backoff_unit_ms: parse_var(
                "STICKY_BACKOFF_UNIT_MS",
                lookup("STICKY_BACKOFF_UNIT_MS"),
                DEFAULT_BACKOFF_UNIT_MS,
            )?,
            backoff_jitter_ms: parse_var(
                "STICKY_BACKOFF_JITTER_MS",
                lookup("STICKY_BACKOFF_JITTER_MS"),
                DEFAULT_BACKOFF_JITTER_MS,
            )?,
            voice_audit_cron: lookup("VOICE_AUDIT_CRON")
                .unwrap_or_else(|| DEFAULT_VOICE_AUDIT_CRON.to_string()),
            error_log_path: lookup("ERROR_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG_PATH)),
        })
    }
}

fn parse_var<T>(name: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional_var(name, value)?.unwrap_or(default))
}

fn parse_optional_var<T>(name: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    name: name.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

/// Parses an optional Discord id, which is never zero.
fn parse_snowflake(name: &str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    match parse_optional_var::<u64>(name, value)? {
        Some(0) => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: "0".to_string(),
            reason: "must be a non-zero Discord id".to_string(),
        }),
        id => Ok(id),
    }
}
