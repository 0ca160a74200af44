use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let anthropic_api_key = require("ANTHROPIC_API_KEY")?;
    let search_api_key = require("SEARCH_API_KEY")?;

    let env = parse_environment(&or_default("PROPGEN_ENV", "development"));

    let bind_addr = or_default("PROPGEN_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PROPGEN_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PROPGEN_LOG_LEVEL", "info");

    let llm_base_url = or_default("PROPGEN_LLM_BASE_URL", "https://api.anthropic.com");
    let llm_model = or_default("PROPGEN_LLM_MODEL", "claude-sonnet-4-20250514");
    let llm_premium_model = or_default("PROPGEN_LLM_PREMIUM_MODEL", "claude-opus-4-1-20250805");
    let llm_timeout_secs = parse_u64("PROPGEN_LLM_TIMEOUT_SECS", "300")?;
    let llm_max_retries = parse_u32("PROPGEN_LLM_MAX_RETRIES", "3")?;
    let llm_backoff_base_ms = parse_u64("PROPGEN_LLM_BACKOFF_BASE_MS", "1000")?;
    let thinking_budget = parse_u32("PROPGEN_THINKING_BUDGET", "10000")?;

    let search_base_url = or_default("PROPGEN_SEARCH_BASE_URL", "https://serpapi.com");
    let search_timeout_secs = parse_u64("PROPGEN_SEARCH_TIMEOUT_SECS", "30")?;
    let search_max_retries = parse_u32("PROPGEN_SEARCH_MAX_RETRIES", "3")?;
    let search_country = or_default("PROPGEN_SEARCH_COUNTRY", "uk");

    let artifact_dir = PathBuf::from(or_default("PROPGEN_ARTIFACT_DIR", "./artifacts"));
    let public_base_url = or_default("PROPGEN_PUBLIC_BASE_URL", "http://localhost:3000")
        .trim_end_matches('/')
        .to_string();
    let chrome_path = PathBuf::from(or_default("PROPGEN_CHROME_PATH", "chromium"));
    let chrome_no_sandbox = parse_bool("PROPGEN_CHROME_NO_SANDBOX", "false")?;
    let run_deadline_secs = parse_u64("PROPGEN_RUN_DEADLINE_SECS", "900")?;
    if run_deadline_secs == 0 {
        return Err(invalid(
            "PROPGEN_RUN_DEADLINE_SECS",
            "deadline must be greater than zero".to_string(),
        ));
    }

    let reference_doc_path = optional_path("PROPGEN_REFERENCE_DOC_PATH");
    let industry_map_path = optional_path("PROPGEN_INDUSTRY_MAP_PATH");
    let testimonials_path = optional_path("PROPGEN_TESTIMONIALS_PATH");
    let agency_name = or_default("PROPGEN_AGENCY_NAME", "Propgen Digital");

    let db_max_connections = parse_u32("PROPGEN_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PROPGEN_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PROPGEN_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        anthropic_api_key,
        llm_base_url,
        llm_model,
        llm_premium_model,
        llm_timeout_secs,
        llm_max_retries,
        llm_backoff_base_ms,
        thinking_budget,
        search_api_key,
        search_base_url,
        search_timeout_secs,
        search_max_retries,
        search_country,
        artifact_dir,
        public_base_url,
        chrome_path,
        chrome_no_sandbox,
        run_deadline_secs,
        reference_doc_path,
        industry_map_path,
        testimonials_path,
        agency_name,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
