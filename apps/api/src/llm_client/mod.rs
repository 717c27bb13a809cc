/// LLM Client — the single point of entry for all model calls in SmartCV.
///
/// ARCHITECTURAL RULE: No other module may talk to a model endpoint directly.
/// All LLM interactions MUST go through `ChatBackend`.
///
/// Both the hosted provider and the local model server speak the OpenAI-compatible
/// `/chat/completions` protocol, so one client covers both; only the endpoint differs.
use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub mod extract;
pub mod prompts;
pub mod schema;
pub mod selector;

#[cfg(test)]
pub mod testing;

use crate::llm_client::schema::{parse_response, ResponseParseError, ResponseSchema};

/// Model served by the local fallback endpoint.
pub const LOCAL_MODEL: &str = "llama3:8b";
/// Model used on the hosted provider.
pub const HOSTED_MODEL: &str = "gpt-4o-2024-08-06";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0}")]
    Configuration(String),

    #[error("{hint}")]
    Unreachable { endpoint: String, hint: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Parse(#[from] ResponseParseError),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Where model calls are sent. The model identifier is a pure function of this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Local { base_url: String },
    Hosted { base_url: String },
}

impl Endpoint {
    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::Local { base_url } | Endpoint::Hosted { base_url } => base_url,
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            Endpoint::Local { .. } => LOCAL_MODEL,
            Endpoint::Hosted { .. } => HOSTED_MODEL,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Endpoint::Local { .. })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url().trim_end_matches('/'))
    }

    /// Turns a failed connection into an actionable message naming this endpoint.
    fn unreachable(&self) -> LlmError {
        let hint = match self {
            Endpoint::Local { base_url } => format!(
                "Could not connect to the local model server at {base_url}. \
                Please make sure it is running (`ollama serve`)."
            ),
            Endpoint::Hosted { base_url } => format!(
                "Could not connect to the AI provider at {base_url}. \
                Check your API key and network connection."
            ),
        };
        LlmError::Unreachable {
            endpoint: self.base_url().to_string(),
            hint,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Local { base_url } => write!(f, "local ({base_url})"),
            Endpoint::Hosted { base_url } => write!(f, "hosted ({base_url})"),
        }
    }
}

/// Per-call sampling options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallOptions {
    pub temperature: f32,
    /// Ask the endpoint for a JSON object response (`response_format`).
    pub json_mode: bool,
}

impl CallOptions {
    pub const fn json(temperature: f32) -> Self {
        CallOptions {
            temperature,
            json_mode: true,
        }
    }
}

/// The seam every pipeline stage talks to. `LlmClient` is the network
/// implementation; tests substitute a scripted one.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn endpoint(&self) -> &Endpoint;

    /// Sends one system + user turn and returns the raw text of the reply.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        options: CallOptions,
    ) -> Result<String, LlmError>;
}

/// Calls the model and decodes the reply as `T`, tolerating fences and preamble.
pub async fn call_json<T: ResponseSchema>(
    llm: &dyn ChatBackend,
    system: &str,
    prompt: &str,
    options: CallOptions,
) -> Result<T, LlmError> {
    let raw = llm.complete(system, prompt, options).await?;
    Ok(parse_response(&raw)?)
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Network client
// ────────────────────────────────────────────────────────────────────────────

/// Handle on one configured endpoint. Holds no request state; cheap to build per request.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    endpoint: Endpoint,
    api_key: String,
    trace: bool,
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("endpoint", &self.endpoint)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    pub fn new(http: Client, endpoint: Endpoint, api_key: String, trace: bool) -> Self {
        Self {
            http,
            endpoint,
            api_key,
            trace,
        }
    }

    pub fn model(&self) -> &'static str {
        self.endpoint.model()
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        options: CallOptions,
    ) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: self.model(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: options.temperature,
            response_format: options.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let started = Instant::now();

        let response = self
            .http
            .post(self.endpoint.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    self.endpoint.unreachable()
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let text = completion.text().ok_or(LlmError::EmptyContent)?.to_string();

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        if self.trace {
            info!(
                target: "llm_trace",
                model = self.model(),
                endpoint = %self.endpoint,
                local = self.endpoint.is_local(),
                json_mode = options.json_mode,
                prompt_chars = prompt.len(),
                response_chars = text.len(),
                prompt_tokens = completion.usage.as_ref().map(|u| u.prompt_tokens),
                completion_tokens = completion.usage.as_ref().map(|u| u.completion_tokens),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "model call"
            );
            debug!(target: "llm_trace", system, prompt, response = %text, "model call payload");
        }

        Ok(text)
    }
}
