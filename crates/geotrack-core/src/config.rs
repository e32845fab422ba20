use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_DB_PATH: &str = "../data/coke_geo.db";
pub const DEFAULT_COMPETITOR_LIMIT: i64 = 10;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the real environment so tests can feed a plain
/// `HashMap` instead of mutating process state.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_addr = {
        let var = "GEOTRACK_BIND_ADDR";
        or_default(var, "0.0.0.0:3000")
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))?
    };

    let db_acquire_timeout_secs = {
        let var = "GEOTRACK_DB_ACQUIRE_TIMEOUT_SECS";
        or_default(var, "10")
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))?
    };

    let competitor_limit = {
        let var = "GEOTRACK_COMPETITOR_LIMIT";
        let raw = or_default(var, &DEFAULT_COMPETITOR_LIMIT.to_string());
        let limit = raw.parse::<i64>().map_err(|e| invalid(var, e.to_string()))?;
        if limit < 1 {
            return Err(invalid(var, format!("must be at least 1, got {limit}")));
        }
        limit
    };

    Ok(AppConfig {
        db_path: PathBuf::from(or_default("GEOTRACK_DB_PATH", DEFAULT_DB_PATH)),
        env: parse_environment(&or_default("GEOTRACK_ENV", "development")),
        bind_addr,
        log_level: or_default("GEOTRACK_LOG_LEVEL", "info"),
        db_acquire_timeout_secs,
        competitor_limit,
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
