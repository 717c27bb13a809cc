//! Axum route handlers for the Gap Analysis API.

use axum::{extract::State, http::HeaderMap, Json};

use crate::errors::AppError;
use crate::gaps::analyzer::analyze_gaps;
use crate::models::gap::{GapAnalysisRequest, GapItem};
use crate::state::AppState;

/// POST /analyze-gaps
///
/// Returns the ordered clarification questions for a CV / job description pair.
/// The optional `X-Model-API-Key` header selects the hosted provider.
pub async fn handle_analyze_gaps(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GapAnalysisRequest>,
) -> Result<Json<Vec<GapItem>>, AppError> {
    if request.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let llm = state.llm_for(&headers)?;
    let gaps = analyze_gaps(&llm, &request).await?;

    Ok(Json(gaps))
}
