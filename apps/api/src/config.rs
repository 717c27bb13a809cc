use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub const DEFAULT_LOCAL_LLM_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_HOSTED_LLM_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_CORRECTIONS: u32 = 2;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Deployment mode. Decides whether requests without a caller key may fall back
/// to the local model server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Development => "development",
            DeploymentMode::Production => "production",
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(DeploymentMode::Development),
            "production" | "prod" => Ok(DeploymentMode::Production),
            other => bail!("ENV must be 'development' or 'production', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Resolved once at startup and shared read-only (behind an `Arc`) with every request.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: DeploymentMode,
    /// Telemetry tracing of model calls (`llm_trace` target).
    pub trace_model_calls: bool,
    pub local_llm_url: String,
    pub hosted_llm_url: String,
    /// Upper bound on correction attempts after the first draft.
    pub max_corrections: u32,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: DeploymentMode::Development,
            trace_model_calls: false,
            local_llm_url: DEFAULT_LOCAL_LLM_URL.to_string(),
            hosted_llm_url: DEFAULT_HOSTED_LLM_URL.to_string(),
            max_corrections: DEFAULT_MAX_CORRECTIONS,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            mode: match std::env::var("ENV") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.mode,
            },
            trace_model_calls: std::env::var("LLM_TRACING")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            local_llm_url: std::env::var("LOCAL_LLM_URL").unwrap_or(defaults.local_llm_url),
            hosted_llm_url: std::env::var("HOSTED_LLM_URL").unwrap_or(defaults.hosted_llm_url),
            max_corrections: match std::env::var("MAX_CORRECTIONS") {
                Ok(value) => value
                    .parse::<u32>()
                    .context("MAX_CORRECTIONS must be a non-negative integer")?,
                Err(_) => defaults.max_corrections,
            },
            cors_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or(defaults.cors_origins),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
