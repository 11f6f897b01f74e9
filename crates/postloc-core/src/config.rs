use crate::app_config::{AppConfig, LocalizerConfig};
use crate::ConfigError;

const DEFAULT_AUSPOST_BASE_URL: &str = "https://digitalapi.auspost.com.au";
const DEFAULT_PROXY_URL: &str = "https://spasdirect.vercel.app";
const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";
const DEFAULT_CART_URL: &str = "https://spasdirect.foxycart.com/cart?name=spapool";

/// Load proxy server configuration from environment variables.
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

/// Load proxy server configuration from variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load localizer configuration, reading `.env` first.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_localizer_config() -> Result<LocalizerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_localizer_config_from_env()
}

/// Load localizer configuration from variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_localizer_config_from_env() -> Result<LocalizerConfig, ConfigError> {
    build_localizer_config(|key| std::env::var(key))
}

/// Build server configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let raw_bind = or_default("POSTLOC_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = raw_bind
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "POSTLOC_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let log_level = or_default("POSTLOC_LOG_LEVEL", "info");

    // An empty key is as good as no key; the proxy reports it per request.
    let auspost_api_key = lookup("AUSPOST_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let auspost_base_url = require_http_url(
        "AUSPOST_BASE_URL",
        or_default("AUSPOST_BASE_URL", DEFAULT_AUSPOST_BASE_URL),
    )?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        auspost_api_key,
        auspost_base_url,
    })
}

/// Build localizer configuration using the provided env-var lookup function.
fn build_localizer_config<F>(lookup: F) -> Result<LocalizerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let proxy_url = require_http_url(
        "POSTLOC_PROXY_URL",
        or_default("POSTLOC_PROXY_URL", DEFAULT_PROXY_URL),
    )?;
    let geocode_url = require_http_url(
        "POSTLOC_GEOCODE_URL",
        or_default("POSTLOC_GEOCODE_URL", DEFAULT_GEOCODE_URL),
    )?;
    let cart_url = require_http_url(
        "POSTLOC_CART_URL",
        or_default("POSTLOC_CART_URL", DEFAULT_CART_URL),
    )?;
    let cache_path = std::path::PathBuf::from(or_default(
        "POSTLOC_CACHE_PATH",
        ".postloc-cache.json",
    ));
    let log_level = or_default("POSTLOC_LOG_LEVEL", "info");

    Ok(LocalizerConfig {
        proxy_url,
        geocode_url,
        cart_url,
        cache_path,
        log_level,
    })
}

/// Rejects values that are obviously not HTTP(S) endpoints. Full URL parsing
/// happens where the HTTP clients are built.
fn require_http_url(var: &str, raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
