// ABOUTME: Configuration helpers for reading Notewise environment variables
// ABOUTME: Thin wrappers with sensible defaults over std::env

pub mod constants;

use std::env;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_API_PORT: u16 = 8000;
pub const DEFAULT_DB_FILE: &str = "notewise.db";

/// API listen port: NOTEWISE_API_PORT, falling back to legacy PORT, then 8000
pub fn api_port() -> u16 {
    for var in [constants::NOTEWISE_API_PORT, constants::PORT] {
        if let Ok(value) = env::var(var) {
            match value.parse() {
                Ok(port) => return port,
                Err(_) => warn!("Ignoring non-numeric {}: {}", var, value),
            }
        }
    }
    DEFAULT_API_PORT
}

/// SQLite database path: NOTEWISE_DB_PATH or ./notewise.db
pub fn database_path() -> PathBuf {
    env::var(constants::NOTEWISE_DB_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_FILE))
}

/// OpenAI API key, if configured
pub fn openai_api_key() -> Option<String> {
    env::var(constants::OPENAI_API_KEY)
        .ok()
        .filter(|key| !key.is_empty())
}

/// Override for the OpenAI base URL (used for self-hosted gateways)
pub fn openai_base_url() -> Option<String> {
    env::var(constants::OPENAI_BASE_URL)
        .ok()
        .filter(|url| !url.is_empty())
}

/// Default completion model override
pub fn openai_model() -> Option<String> {
    env::var(constants::OPENAI_MODEL)
        .ok()
        .filter(|model| !model.is_empty())
}

/// Allowed CORS origin for the browser client, if restricted
pub fn cors_origin() -> Option<String> {
    env::var(constants::NOTEWISE_CORS_ORIGIN)
        .ok()
        .filter(|origin| !origin.is_empty())
}
