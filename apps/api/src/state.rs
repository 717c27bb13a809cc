use std::sync::Arc;

use axum::http::HeaderMap;
use reqwest::Client;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::selector::select_backend;
use crate::llm_client::LlmClient;

/// Header carrying a caller-supplied model credential.
pub const API_KEY_HEADER: &str = "x-model-api-key";

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; nothing request-specific lives here.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Connection pool shared by every per-request `LlmClient`.
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: Client::new(),
        }
    }

    /// Builds the model client for one request from the optional credential header.
    pub fn llm_for(&self, headers: &HeaderMap) -> Result<LlmClient, AppError> {
        let caller_key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        Ok(select_backend(&self.config, &self.http, caller_key)?)
    }
}
