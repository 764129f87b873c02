use crate::constants::{
    DEFAULT_HTTP_CLIENT_TIMEOUT_SECS, DEFAULT_TUNNEL_MAX_ATTEMPTS, DEFAULT_TUNNEL_RETRY_DELAY_MS,
};
use std::env;
use std::fs;

#[derive(Debug, Clone)]
pub struct Config {
    pub service_address: String,
    pub cors_allowed_origin: String,
    pub jwt_secret: String,
    pub t24_user: String,
    pub t24_pass: String,
    pub tunnel_api_url: String,
    pub tunnel_max_attempts: u32,
    pub tunnel_retry_delay_ms: u64,
    pub http_client_timeout_secs: u64,
    pub debug_mode: bool,
}

/// Load configuration from a JSON config file (if present) and environment
/// variables. Environment variables take precedence over config file values.
///
/// Config file path is read from `CONFIG_FILE` env var (default: `config.json`).
pub fn load_config() -> Config {
    let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.json".to_string());
    let file_values: serde_json::Value = fs::read_to_string(&config_path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
        .unwrap_or(serde_json::Value::Null);

    let from_file = |key: &str| -> Option<String> {
        file_values
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    let service_address = env::var("SERVICE_ADDRESS")
        .ok()
        .or_else(|| from_file("service_address"))
        .unwrap_or_else(|| "0.0.0.0:3005".to_string());

    let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
        .ok()
        .or_else(|| from_file("cors_allowed_origin"))
        .unwrap_or_else(|| "http://localhost:59222".to_string());

    let jwt_secret = env::var("SECRET_KEY")
        .ok()
        .or_else(|| from_file("jwt_secret"))
        .unwrap_or_else(|| "maCleSecreteJWT".to_string());

    let t24_user = env::var("T24_USER")
        .ok()
        .or_else(|| from_file("t24_user"))
        .unwrap_or_else(|| "GTSUSER".to_string());

    let t24_pass = env::var("T24_PASS")
        .ok()
        .or_else(|| from_file("t24_pass"))
        .unwrap_or_else(|| "1234567".to_string());

    let tunnel_api_url = env::var("TUNNEL_API_URL")
        .ok()
        .or_else(|| from_file("tunnel_api_url"))
        .unwrap_or_else(|| "http://127.0.0.1:4040/api/tunnels".to_string());

    let tunnel_max_attempts = env::var("TUNNEL_MAX_ATTEMPTS")
        .ok()
        .or_else(|| from_file("tunnel_max_attempts"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TUNNEL_MAX_ATTEMPTS);

    let tunnel_retry_delay_ms = env::var("TUNNEL_RETRY_DELAY_MS")
        .ok()
        .or_else(|| from_file("tunnel_retry_delay_ms"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TUNNEL_RETRY_DELAY_MS);

    let http_client_timeout_secs = env::var("HTTP_CLIENT_TIMEOUT_SECS")
        .ok()
        .or_else(|| from_file("http_client_timeout_secs"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HTTP_CLIENT_TIMEOUT_SECS);

    let debug_mode = env::var("DEBUG_MODE")
        .ok()
        .or_else(|| from_file("debug_mode"))
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    Config {
        service_address,
        cors_allowed_origin,
        jwt_secret,
        t24_user,
        t24_pass,
        tunnel_api_url,
        tunnel_max_attempts,
        tunnel_retry_delay_ms,
        http_client_timeout_secs,
        debug_mode,
    }
}
