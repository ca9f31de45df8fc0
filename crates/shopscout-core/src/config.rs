use crate::app_config::{ScoutConfig, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_config() -> Result<ScoutConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_config_from_env() -> Result<ScoutConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function, so tests
/// can feed a `HashMap` instead of mutating the process environment.
fn build_config<F>(lookup: F) -> Result<ScoutConfig, ConfigError>
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

    let log_level = or_default("SHOPSCOUT_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SHOPSCOUT_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("SHOPSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let max_results = parse_usize("SHOPSCOUT_MAX_RESULTS", "20")?;
    let max_retries = parse_u32("SHOPSCOUT_MAX_RETRIES", "5")?;
    let retry_delay_secs = parse_u64("SHOPSCOUT_RETRY_DELAY_SECS", "8")?;
    let output_dir = PathBuf::from(or_default("SHOPSCOUT_OUTPUT_DIR", "."));

    if max_results == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPSCOUT_MAX_RESULTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if max_retries == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPSCOUT_MAX_RETRIES".to_string(),
            reason: "must allow at least one attempt".to_string(),
        });
    }

    if user_agent.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPSCOUT_USER_AGENT".to_string(),
            reason: "must not be blank".to_string(),
        });
    }

    Ok(ScoutConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        max_results,
        max_retries,
        retry_delay_secs,
        output_dir,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
