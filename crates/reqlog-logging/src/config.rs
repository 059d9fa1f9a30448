//! The two configuration values the logging core consumes
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file:
//!
//! | variable      | default       |
//! |---------------|---------------|
//! | `ENVIRONMENT` | `development` |
//! | `LOG_LEVEL`   | `info`        |

use std::collections::HashMap;
use std::path::Path;

use reqlog_core_types::schema::ENV_PRODUCTION;
use reqlog_errors::{ReqlogError, Result};
use tracing::level_filters::LevelFilter;

use crate::logger::Logger;

pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Diagnostics target for configuration problems
pub const CONFIG_TARGET: &str = "reqlog::config";

const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub environment: String,
    pub log_level: LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl LoggingConfig {
    /// Read from the process environment after loading `.env` if present
    ///
    /// Variables already set in the environment take precedence over the
    /// file. A missing `.env` is not an error; an unreadable one is reported
    /// on the `reqlog::config` target right away. Use [`LoggingConfig::load`]
    /// when diagnostics are installed only after configuration is known.
    pub fn from_env() -> Self {
        let (config, dotenv_error) = Self::load();
        if let Some(err) = dotenv_error {
            report_dotenv_error(&err);
        }
        config
    }

    /// Like [`LoggingConfig::from_env`], but hands back the `.env` problem
    /// instead of reporting it
    ///
    /// Lines before a malformed one are still applied.
    pub fn load() -> (Self, Option<ReqlogError>) {
        let dotenv_error = match dotenvy::dotenv() {
            Err(err) if !err.not_found() => Some(ReqlogError::Config(format!(".env: {err}"))),
            _ => None,
        };
        (Self::from_lookup(|key| std::env::var(key).ok()), dotenv_error)
    }

    /// Read only the given dotenv file, ignoring the process environment
    ///
    /// # Errors
    ///
    /// Returns `ReqlogError::Config` when the file is missing or malformed.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let vars = dotenvy::from_path_iter(path.as_ref())
            .and_then(|iter| iter.collect::<std::result::Result<HashMap<_, _>, _>>())
            .map_err(|err| {
                ReqlogError::Config(format!("{}: {err}", path.as_ref().display()))
            })?;
        Ok(Self::from_lookup(|key| vars.get(key).cloned()))
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup(ENV_ENVIRONMENT).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let log_level = lookup(ENV_LOG_LEVEL)
            .map(|level| parse_log_level(&level))
            .unwrap_or(DEFAULT_LOG_LEVEL);
        Self {
            environment,
            log_level,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == ENV_PRODUCTION
    }

    /// Base logger on stdout for this configuration
    pub fn build_logger(&self) -> Logger {
        Logger::new(&self.environment, self.log_level)
    }
}

/// Emit the diagnostics warning for a `.env` file that could not be applied
pub fn report_dotenv_error(err: &ReqlogError) {
    tracing::warn!(
        target: CONFIG_TARGET,
        error = %err,
        err_code = err.code(),
        "ignoring unreadable .env file"
    );
}

/// Case-insensitive level name; anything unrecognised means INFO
pub fn parse_log_level(level: &str) -> LevelFilter {
    parse_log_level_strict(level).unwrap_or(LevelFilter::INFO)
}

/// Like [`parse_log_level`] but rejects unknown names
///
/// # Errors
///
/// Returns `ReqlogError::InvalidLevel` for anything other than
/// trace, debug, info, warn/warning or error.
pub fn parse_log_level_strict(level: &str) -> Result<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(ReqlogError::InvalidLevel(level.to_string())),
    }
}
