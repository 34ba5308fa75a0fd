use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Headless-browser capture endpoint that turns print HTML into PDF bytes.
    pub pdf_capture_url: String,
    pub pdf_capture_timeout_secs: u64,
    /// Optional directory of extra `*.json` templates layered over the built-in catalog.
    pub templates_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            pdf_capture_url: require_env("PDF_CAPTURE_URL")?,
            pdf_capture_timeout_secs: std::env::var("PDF_CAPTURE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("PDF_CAPTURE_TIMEOUT_SECS must be a whole number of seconds")?,
            templates_dir: std::env::var("TEMPLATES_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
