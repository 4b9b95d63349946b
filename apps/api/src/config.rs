use anyhow::{Context, Result};

const DEFAULT_API_BASE: &str = "https://api.jamaibase.com";
const DEFAULT_TABLE_ID: &str = "Resume_Analyzer";

/// Application configuration loaded from environment variables.
/// Startup fails if the remote project credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub jamai_project_id: String,
    pub jamai_pat: String,
    pub jamai_api_base: String,
    pub table_id: String,
    pub remote_timeout_secs: u64,
    pub remote_max_retries: u32,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            jamai_project_id: require("JAMAI_PROJECT_ID")?,
            jamai_pat: require("JAMAI_PAT")?,
            jamai_api_base: or_default("JAMAI_API_BASE", DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            table_id: or_default("JAMAI_TABLE_ID", DEFAULT_TABLE_ID),
            remote_timeout_secs: or_default("REMOTE_TIMEOUT_SECS", "300")
                .parse::<u64>()
                .context("REMOTE_TIMEOUT_SECS must be a whole number of seconds")?,
            remote_max_retries: or_default("REMOTE_MAX_RETRIES", "3")
                .parse::<u32>()
                .context("REMOTE_MAX_RETRIES must be a non-negative integer")?,
            max_upload_bytes: or_default("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            jamai_project_id: "proj_test".to_string(),
            jamai_pat: "pat_test".to_string(),
            jamai_api_base: "http://localhost:6969".to_string(),
            table_id: DEFAULT_TABLE_ID.to_string(),
            remote_timeout_secs: 5,
            remote_max_retries: 0,
            max_upload_bytes: 1024 * 1024,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}
