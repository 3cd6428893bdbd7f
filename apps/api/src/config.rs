use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_COMPLETION_BASE_URL: &str = "https://matcha.harriscomputer.com/rest/api/v1";
const DEFAULT_MISSION_ID: u64 = 7618;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub completion_api_key: String,
    pub completion_base_url: String,
    pub mission_id: u64,
    pub completion_timeout: Duration,
    pub upload_dir: PathBuf,
    pub font_dir: PathBuf,
    pub font_family: String,
    /// When false, only `.txt` templates contribute text to prompts.
    pub template_extract_all: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL", "sqlite://sow.db"),
            completion_api_key: require_env("COMPLETION_API_KEY")?,
            completion_base_url: optional_env("COMPLETION_BASE_URL", DEFAULT_COMPLETION_BASE_URL),
            mission_id: parse_env("MISSION_ID", DEFAULT_MISSION_ID)?,
            completion_timeout: Duration::from_secs(parse_env("COMPLETION_TIMEOUT_SECS", 30)?),
            upload_dir: PathBuf::from(optional_env("UPLOAD_DIR", "uploads")),
            font_dir: PathBuf::from(optional_env("FONT_DIR", "./fonts")),
            font_family: optional_env("FONT_FAMILY", "LiberationSans"),
            template_extract_all: parse_env("TEMPLATE_EXTRACT_ALL", false)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config pointing at throwaway locations; never reads the environment.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            completion_api_key: "test-key".to_string(),
            completion_base_url: "http://127.0.0.1:9".to_string(),
            mission_id: DEFAULT_MISSION_ID,
            completion_timeout: Duration::from_secs(1),
            upload_dir,
            font_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_string(),
            template_extract_all: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
