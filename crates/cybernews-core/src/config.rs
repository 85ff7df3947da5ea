use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "CyberNewsAggregator/0.1 (+portfolio; respectful scraping)";

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
/// `DATABASE_URL` is optional here; the CLI requires it only when running
/// against PostgreSQL.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let database_url = lookup("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());
    let log_level = or_default("CYBERNEWS_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "CYBERNEWS_SOURCES_PATH",
        "./config/sources.yaml",
    ));
    let user_agent = or_default("CYBERNEWS_USER_AGENT", DEFAULT_USER_AGENT);
    let request_timeout_secs = parse_u64("CYBERNEWS_REQUEST_TIMEOUT_SECS", "15")?;

    let per_domain_rps = or_default("CYBERNEWS_PER_DOMAIN_RPS", "0.5")
        .parse::<f64>()
        .map_err(|e| invalid("CYBERNEWS_PER_DOMAIN_RPS", e.to_string()))?;
    if !per_domain_rps.is_finite() || per_domain_rps <= 0.0 {
        return Err(invalid(
            "CYBERNEWS_PER_DOMAIN_RPS",
            "must be a positive number".to_string(),
        ));
    }

    let max_concurrent_sources = parse_positive_usize("CYBERNEWS_MAX_CONCURRENT_SOURCES", "1")?;
    let summary_sentences = parse_positive_usize("CYBERNEWS_SUMMARY_SENTENCES", "5")?;

    let db_max_connections = parse_u32("CYBERNEWS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("CYBERNEWS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("CYBERNEWS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        log_level,
        sources_path,
        user_agent,
        request_timeout_secs,
        per_domain_rps,
        max_concurrent_sources,
        summary_sentences,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
