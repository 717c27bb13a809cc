//! Axum route handlers for the Generation API.

use axum::{extract::State, http::HeaderMap, Json};

use crate::errors::AppError;
use crate::generation::pipeline::generate_cv;
use crate::models::resume::{FinalArtifact, GenerationRequest};
use crate::state::AppState;

/// POST /generate-cv
///
/// Runs the full pipeline and returns the assembled document.
/// The optional `X-Model-API-Key` header selects the hosted provider.
pub async fn handle_generate_cv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<FinalArtifact>, AppError> {
    if request.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let llm = state.llm_for(&headers)?;
    let artifact = generate_cv(&llm, &request, state.config.max_corrections).await?;

    Ok(Json(artifact))
}
