//! Configuration loading from the process environment.
//!
//! `main` loads an optional `.env` first, so values there behave exactly like
//! real environment variables. Required: `TELEGRAM_BOT_TOKEN`, `RAPIDAPI_KEY`.
//! Optional: `RELAY_LOG_LEVEL`, `RELAY_HTTP_TIMEOUT_SECS`.

use std::{env, fmt, time::Duration};

use tracing::level_filters::LevelFilter;

use crate::error::AppError;

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const API_KEY_VAR: &str = "RAPIDAPI_KEY";
pub const LOG_LEVEL_VAR: &str = "RELAY_LOG_LEVEL";
pub const HTTP_TIMEOUT_VAR: &str = "RELAY_HTTP_TIMEOUT_SECS";

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Fully-resolved startup configuration. Built once, then moved into the
/// components that need each piece.
#[derive(Clone)]
pub struct Config {
    /// Bot token for the Telegram Bot API.
    pub telegram_bot_token: String,
    /// Completion provider credential, sent as `X-RapidAPI-Key`.
    pub api_key: String,
    /// Default log filter; `RUST_LOG` directives replace it.
    pub log_level: LevelFilter,
    /// Per-request timeout for the completion call. `None` means unbounded.
    pub http_timeout: Option<Duration>,
}

// Secrets stay out of log output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_bot_token", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("log_level", &self.log_level)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Load config from the process environment.
pub fn load() -> Result<Config, AppError> {
    load_from(|name| env::var(name).ok())
}

/// Internal loader: resolves every variable through `lookup`.
/// Tests pass a closure over a map instead of mutating env vars.
pub fn load_from<F>(lookup: F) -> Result<Config, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let telegram_bot_token = required(&lookup, TELEGRAM_TOKEN_VAR)?;
    let api_key = required(&lookup, API_KEY_VAR)?;

    let log_level = match non_empty(&lookup, LOG_LEVEL_VAR) {
        None => DEFAULT_LOG_LEVEL,
        Some(raw) => parse_level(&raw)?,
    };

    let http_timeout = match non_empty(&lookup, HTTP_TIMEOUT_VAR) {
        None => Some(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        Some(raw) => parse_timeout(&raw)?,
    };

    Ok(Config { telegram_bot_token, api_key, log_level, http_timeout })
}

fn required<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name).ok_or_else(|| AppError::Config(format!("{name} is not set")))
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn parse_level(raw: &str) -> Result<LevelFilter, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::Config(format!(
            "{LOG_LEVEL_VAR} must be one of off, error, warn, info, debug, trace; got '{raw}'"
        ))
    })
}

/// `0` disables the timeout.
fn parse_timeout(raw: &str) -> Result<Option<Duration>, AppError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        AppError::Config(format!(
            "{HTTP_TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"
        ))
    })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
