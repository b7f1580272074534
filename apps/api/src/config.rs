use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the text-generation backend (e.g. http://localhost:8081).
    pub generator_url: String,
    /// Per-request generation timeout. Elapsed timeouts are treated as a
    /// generation failure and routed to the fallback script path.
    pub generator_timeout_secs: u64,
    /// Optional path to an industry profiles YAML file. When unset, the
    /// embedded default profile set is used.
    pub profiles_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            generator_url: require_env("GENERATOR_URL")?,
            generator_timeout_secs: std::env::var("GENERATOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "90".to_string())
                .parse::<u64>()
                .context("GENERATOR_TIMEOUT_SECS must be a number of seconds")?,
            profiles_path: std::env::var("PROFILES_PATH").ok(),
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
