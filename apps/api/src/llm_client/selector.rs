//! Backend selection: which endpoint, credential and model a request runs against.

use reqwest::Client;
use tracing::debug;

use crate::config::{Config, DeploymentMode};
use crate::llm_client::{Endpoint, LlmClient, LlmError};

/// Credential sent to the local model server, which ignores it.
pub const LOCAL_PLACEHOLDER_KEY: &str = "ollama";

/// Resolves endpoint and credential without touching the network.
///
/// - caller key present → hosted provider, in any mode
/// - no key, production → `LlmError::Configuration`
/// - no key, development → local server with the placeholder credential
pub fn resolve_endpoint(
    config: &Config,
    caller_key: Option<&str>,
) -> Result<(Endpoint, String), LlmError> {
    let caller_key = caller_key.map(str::trim).filter(|k| !k.is_empty());

    match (caller_key, config.mode) {
        (Some(key), _) => Ok((
            Endpoint::Hosted {
                base_url: config.hosted_llm_url.clone(),
            },
            key.to_string(),
        )),
        (None, DeploymentMode::Production) => Err(LlmError::Configuration(
            "API key is required in production. Provide it via the X-Model-API-Key header."
                .to_string(),
        )),
        (None, DeploymentMode::Development) => Ok((
            Endpoint::Local {
                base_url: config.local_llm_url.clone(),
            },
            LOCAL_PLACEHOLDER_KEY.to_string(),
        )),
    }
}

/// Builds the model client for one request.
pub fn select_backend(
    config: &Config,
    http: &Client,
    caller_key: Option<&str>,
) -> Result<LlmClient, LlmError> {
    let (endpoint, api_key) = resolve_endpoint(config, caller_key)?;
    debug!("Selected {} endpoint, model {}", endpoint, endpoint.model());
    Ok(LlmClient::new(
        http.clone(),
        endpoint,
        api_key,
        config.trace_model_calls,
    ))
}
