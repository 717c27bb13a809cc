//! Axum route handlers for PDF text extraction.

use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::upload::pdf::{extract_text, has_pdf_extension};

/// Multipart field carrying the uploaded document.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// POST /extract-text
///
/// Accepts a multipart upload with a `file` field and returns its plain text.
/// Anything not named `*.pdf` is rejected before parsing.
pub async fn handle_extract_text(
    mut multipart: Multipart,
) -> Result<Json<ExtractTextResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !has_pdf_extension(&file_name) {
            return Err(AppError::Validation(
                "Only .pdf files are supported".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let text = extract_text(data).await?;
        info!("Extracted text from '{file_name}' ({} chars)", text.len());

        return Ok(Json(ExtractTextResponse { text }));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}
