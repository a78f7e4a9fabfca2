use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON object `{ "<role>": ["skill", ...] }` replacing the built-in catalog.
    pub skill_catalog_path: Option<PathBuf>,
    /// JSON array of `{ "role", "description" }` job-description records.
    pub jd_dataset_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Most recent analysis runs kept in the history.
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            skill_catalog_path: None,
            jd_dataset_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            skill_catalog_path: optional_path("SKILL_CATALOG_PATH"),
            jd_dataset_path: optional_path("JD_DATASET_PATH"),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a positive integer")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            history_capacity: match std::env::var("HISTORY_CAPACITY") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("HISTORY_CAPACITY must be a positive integer")?,
                Err(_) => DEFAULT_HISTORY_CAPACITY,
            },
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
