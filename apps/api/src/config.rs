use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Bearer token guarding the admin fetch trigger. When unset, the
    /// trigger is open (local development behavior).
    pub admin_api_key: Option<String>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            admin_api_key: std::env::var("ADMIN_API_KEY").ok().filter(|k| !k.is_empty()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a number")?
                * 1024
                * 1024,
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
