use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub prompts_path: PathBuf,
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            prompts_path: std::env::var("PROMPTS_PATH")
                .unwrap_or_else(|_| "prompts/prompt.yaml".to_string())
                .into(),
            session_idle_timeout: Duration::from_secs(
                std::env::var("SESSION_IDLE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value =
        std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}
