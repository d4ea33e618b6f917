use anyhow::{Context, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
/// 25 MiB, enough for a multi-page PDF resume upload.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 25 * 1024 * 1024;

/// Gateway configuration loaded from environment variables.
/// Every variable has a default; startup only fails on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream base URL, stored without a trailing slash.
    pub backend_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub max_response_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend_url = lookup("BACKEND_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Ok(Config {
            backend_url: normalize_base_url(&backend_url),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: byte_count(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            max_response_bytes: byte_count(
                &lookup,
                "MAX_RESPONSE_BYTES",
                DEFAULT_MAX_RESPONSE_BYTES,
            )?,
        })
    }
}

fn byte_count(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize> {
    match lookup(key) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("{key} must be a byte count, got '{raw}'")),
        None => Ok(default),
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
