//! Gap Analysis stage — one model call, all-or-nothing.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::gaps::prompts::{
    build_gap_analysis_prompt, GAP_ANALYSIS_SYSTEM, MAX_QUESTIONS, MIN_QUESTIONS,
};
use crate::llm_client::schema::ResponseSchema;
use crate::llm_client::{call_json, CallOptions, ChatBackend};
use crate::models::gap::{GapAnalysisRequest, GapItem};

const GAP_ANALYSIS_OPTIONS: CallOptions = CallOptions::json(0.2);

/// Wire shape of the gap analysis reply.
#[derive(Debug, Deserialize)]
pub struct GapList {
    pub items: Vec<GapItem>,
}

impl ResponseSchema for GapList {
    const NAME: &'static str = "gap-list";
}

/// Asks the model for clarification questions, in priority order.
///
/// A malformed reply surfaces as `ResponseParse`; no partial list is ever returned.
/// Counts outside [MIN_QUESTIONS, MAX_QUESTIONS] are a prompt-quality issue and only logged.
pub async fn analyze_gaps(
    llm: &dyn ChatBackend,
    request: &GapAnalysisRequest,
) -> Result<Vec<GapItem>, AppError> {
    let language = request.language();
    let prompt = build_gap_analysis_prompt(&request.cv_text, &request.job_description, language);

    info!(
        "Running gap analysis on {} (model: {}, language: {})",
        llm.endpoint(),
        llm.endpoint().model(),
        language.code()
    );

    let gaps: GapList = call_json(llm, GAP_ANALYSIS_SYSTEM, &prompt, GAP_ANALYSIS_OPTIONS).await?;

    if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&gaps.items.len()) {
        warn!(
            "Gap analysis returned {} questions (expected {}-{})",
            gaps.items.len(),
            MIN_QUESTIONS,
            MAX_QUESTIONS
        );
    }

    info!("Gap analysis produced {} questions", gaps.items.len());
    Ok(gaps.items)
}
