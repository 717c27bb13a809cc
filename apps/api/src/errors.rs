use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::schema::ResponseParseError;
use crate::llm_client::LlmError;
use crate::upload::pdf::PdfError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant is scoped to one request; messages always reach the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    BackendUnreachable(String),

    #[error(transparent)]
    ResponseParse(#[from] ResponseParseError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("{0}")]
    GenerationExhausted(String),

    #[error("Error processing PDF: {0}")]
    PdfProcessing(#[from] PdfError),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(msg) => AppError::Configuration(msg),
            LlmError::Unreachable { hint, .. } => AppError::BackendUnreachable(hint),
            LlmError::Parse(e) => AppError::ResponseParse(e),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let mut raw_output = None;

        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            AppError::BackendUnreachable(msg) => {
                tracing::error!("Model backend unreachable: {msg}");
                (StatusCode::BAD_GATEWAY, "BACKEND_UNREACHABLE")
            }
            AppError::ResponseParse(e) => {
                tracing::error!(
                    schema = e.schema,
                    raw_output = %e.raw_output,
                    "Model response did not match schema: {}",
                    e.reason
                );
                raw_output = Some(e.raw_output.clone());
                (StatusCode::BAD_GATEWAY, "RESPONSE_PARSE_ERROR")
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR")
            }
            AppError::GenerationExhausted(msg) => {
                tracing::error!("Generation exhausted: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_EXHAUSTED")
            }
            AppError::PdfProcessing(e) => {
                tracing::warn!("PDF processing failed: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, "PDF_PROCESSING_ERROR")
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(raw) = raw_output {
            error["raw_output"] = json!(raw);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
