use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Base URL used when neither `LNF_API_URL` nor `NEXT_PUBLIC_API_URL` is set.
pub const DEFAULT_API_BASE_URL: &str = "/api";

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
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development config pointed at `/api`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("LNF_ENV", "development"))?;

    let api_base_url = optional("LNF_API_URL")
        .or_else(|| optional("NEXT_PUBLIC_API_URL"))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    validate_base_url(&api_base_url)?;

    let api_host = optional("LNF_API_HOST")
        .or_else(|| optional("NEXT_PUBLIC_API_HOST"))
        .map(|h| h.trim_end_matches('/').to_string());

    let log_level = or_default("LNF_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("LNF_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LNF_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    let user_agent = or_default("LNF_USER_AGENT", "lnf/0.1 (lost-and-found)");
    let token_store_path = PathBuf::from(or_default("LNF_TOKEN_STORE_PATH", "./.lnf/tokens.json"));

    Ok(AppConfig {
        env,
        api_base_url,
        api_host,
        log_level,
        request_timeout_secs,
        user_agent,
        token_store_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than the three known names.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LNF_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// A base URL is either an absolute `http(s)://` URL or a root-relative path.
fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let ok = url.starts_with('/') || url.starts_with("http://") || url.starts_with("https://");
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "LNF_API_URL".to_string(),
            reason: format!("\"{url}\" is neither an http(s) URL nor a path starting with '/'"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
