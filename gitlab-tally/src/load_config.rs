//! `load_config` module: builds a [`TallyConfig`] from an optional YAML file and
//! the process environment.
//!
//! The YAML file only carries non-secret settings. The token always comes from
//! the environment, and environment values win over the file.
//!
//! # Recognised keys
//! | YAML key               | Environment            | Default              |
//! |------------------------|------------------------|----------------------|
//! | (none)                 | `GITLAB_PRIVATE_TOKEN` | required             |
//! | `gitlab_url`           | `GITLAB_URL`           | `https://gitlab.com` |
//! | `pattern`              | `PATTERN_TO_FIND`      | empty (match all)    |
//! | `since_days`           | `SINCE_DAYS`           | 360                  |
//! | `concurrency`          | `CONCURRENCY_NUMBER`   | 20                   |
//! | `request_timeout_secs` | `REQUEST_TIMEOUT_SECS` | 60 (`0` disables)    |
//!
//! # Errors
//! Only a missing token or an unreadable/unparsable file is an error. Invalid
//! numbers fall back to their default with a warning.
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use gitlab_tally_core::config::{
    GitlabConfig, TallyConfig, DEFAULT_CONCURRENCY, DEFAULT_GITLAB_URL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SINCE_DAYS,
};
use serde::Deserialize;
use tracing::{error, info, warn};

pub const TOKEN_VAR: &str = "GITLAB_PRIVATE_TOKEN";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub gitlab_url: Option<String>,
    pub pattern: Option<String>,
    pub since_days: Option<i64>,
    pub concurrency: Option<i64>,
    pub request_timeout_secs: Option<i64>,
}

/// Reads the optional YAML file, then layers the environment on top.
pub fn load_config(path: Option<&Path>) -> Result<TallyConfig> {
    let file = match path {
        Some(path) => read_file_config(path)?,
        None => {
            info!("No config file given, using environment and defaults");
            FileConfig::default()
        }
    };

    let token = match env_value(TOKEN_VAR) {
        Some(token) => token,
        None => {
            error!("{TOKEN_VAR} environment variable not set");
            anyhow::bail!("{TOKEN_VAR} environment variable must be set.");
        }
    };

    let base_url = match env_value("GITLAB_URL").or(non_empty(file.gitlab_url)) {
        Some(url) => url,
        None => {
            info!(default = DEFAULT_GITLAB_URL, "Gitlab URL is not set, using default");
            DEFAULT_GITLAB_URL.to_string()
        }
    };

    let mut gitlab = GitlabConfig::new(base_url, token);
    gitlab.request_timeout = resolve_timeout(file.request_timeout_secs);

    let mut config = TallyConfig::new(gitlab);
    config.pattern = env_value("PATTERN_TO_FIND")
        .or(non_empty(file.pattern))
        .unwrap_or_default();
    config.since_days = resolve_positive("SINCE_DAYS", file.since_days, DEFAULT_SINCE_DAYS);
    config.concurrency =
        resolve_positive("CONCURRENCY_NUMBER", file.concurrency, DEFAULT_CONCURRENCY);

    info!(
        gitlab_url = %config.gitlab.base_url,
        since_days = config.since_days,
        concurrency = config.concurrency,
        "Config loaded and merged successfully"
    );
    Ok(config)
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty file is a valid "no overrides" config.
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    match serde_yaml::from_str(&content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Non-empty value of an environment variable.
fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// File strings get the same treatment as environment values: blank means unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Environment first, then file. Anything unparsable, non-positive or out of
/// range falls back to `default` with a warning.
fn resolve_positive<T>(key: &'static str, file_value: Option<i64>, default: T) -> T
where
    T: TryFrom<i64> + Display + Copy,
{
    let raw = match env_value(key) {
        Some(raw) => raw,
        None => match file_value {
            Some(value) => value.to_string(),
            None => return default,
        },
    };

    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => T::try_from(value).unwrap_or_else(|_| {
            warn!(key, value, %default, "Value out of range, using default");
            default
        }),
        Ok(value) => {
            warn!(key, value, %default, "Value must be positive, using default");
            default
        }
        Err(e) => {
            warn!(key, raw = %raw, error = %e, %default, "Error parsing value, using default");
            default
        }
    }
}

fn resolve_timeout(file_value: Option<i64>) -> Option<Duration> {
    const KEY: &str = "REQUEST_TIMEOUT_SECS";
    let raw = match env_value(KEY) {
        Some(raw) => raw,
        None => match file_value {
            Some(value) => value.to_string(),
            None => return Some(DEFAULT_REQUEST_TIMEOUT),
        },
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => {
            warn!(key = KEY, "Request timeout disabled; a hung request can stall a project forever");
            None
        }
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(e) => {
            warn!(
                key = KEY,
                raw = %raw,
                error = %e,
                default_secs = DEFAULT_REQUEST_TIMEOUT.as_secs(),
                "Error parsing request timeout, using default"
            );
            Some(DEFAULT_REQUEST_TIMEOUT)
        }
    }
}
