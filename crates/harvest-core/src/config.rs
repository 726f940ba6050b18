use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so the only failure mode is a value that
/// does not parse.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_flag = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{raw}\""),
        })
    };

    let env = parse_environment(&or_default("HARVEST_ENV", "development"));
    let log_level = or_default("HARVEST_LOG_LEVEL", "info");
    let site_path = PathBuf::from(or_default("HARVEST_SITE_PATH", "./config/site.yaml"));
    let webdriver_url = or_default("HARVEST_WEBDRIVER_URL", "http://localhost:4444");
    let headless = parse_flag("HARVEST_HEADLESS", "true")?;

    let navigation_timeout_secs = parse_u64("HARVEST_NAVIGATION_TIMEOUT_SECS", "60")?;
    let settle_timeout_ms = parse_u64("HARVEST_SETTLE_TIMEOUT_MS", "5000")?;
    let poll_interval_ms = parse_u64("HARVEST_POLL_INTERVAL_MS", "250")?;
    let max_load_more = parse_usize("HARVEST_MAX_LOAD_MORE", "500")?;

    let dedupe_urls = parse_flag("HARVEST_DEDUPE_URLS", "false")?;
    let item_retries = parse_u32("HARVEST_ITEM_RETRIES", "0")?;
    let retry_backoff_ms = parse_u64("HARVEST_RETRY_BACKOFF_MS", "1000")?;

    if poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HARVEST_POLL_INTERVAL_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        site_path,
        webdriver_url,
        headless,
        navigation_timeout_secs,
        settle_timeout_ms,
        poll_interval_ms,
        max_load_more,
        dedupe_urls,
        item_retries,
        retry_backoff_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
