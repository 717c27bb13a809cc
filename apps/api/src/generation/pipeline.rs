//! CV Generation — orchestrates the full generation pipeline as an explicit state machine.
//!
//! Flow: ContactExtraction → Drafting → Validating → (Accepted | Correcting → Validating…)
//!
//! Decisions branch on the `ValidationVerdict` value; errors (backend, parse) end the
//! run immediately. Every stage runs strictly after the previous one.

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::assembler::assemble;
use crate::generation::contact::extract_contact;
use crate::generation::prompts::{
    build_correction_prompt, build_generation_prompt, CORRECTION_SYSTEM, GENERATION_SYSTEM,
};
use crate::generation::validation::validate_draft;
use crate::llm_client::{call_json, CallOptions, ChatBackend};
use crate::models::resume::{
    ContactInfo, CorrectedCv, CvDraft, FinalArtifact, GenerationRequest, ValidationVerdict,
};

const GENERATION_OPTIONS: CallOptions = CallOptions::json(0.0);

/// A draft body and the report that currently describes it.
#[derive(Debug, Clone)]
struct Candidate {
    body: String,
    report: Option<String>,
}

#[derive(Debug)]
enum PipelineState {
    ContactExtraction,
    Drafting {
        contact: ContactInfo,
    },
    Validating {
        contact: ContactInfo,
        candidate: Candidate,
        corrections: u32,
    },
    Correcting {
        contact: ContactInfo,
        candidate: Candidate,
        corrections: u32,
        verdict: ValidationVerdict,
    },
    Accepted {
        contact: ContactInfo,
        candidate: Candidate,
    },
}

/// Runs one generation request end to end.
///
/// At most `max_corrections + 1` generation attempts (draft + corrections) are made;
/// a body still failing validation after that yields `GenerationExhausted` and no
/// further model calls. An unvalidated body is never returned.
pub async fn generate_cv(
    llm: &dyn ChatBackend,
    request: &GenerationRequest,
    max_corrections: u32,
) -> Result<FinalArtifact, AppError> {
    let run_id = Uuid::new_v4();
    info!(
        "[{run_id}] Starting CV generation on {} (model: {}, language: {}, answers: {})",
        llm.endpoint(),
        llm.endpoint().model(),
        request.language().code(),
        request.user_answers.len()
    );

    let mut state = PipelineState::ContactExtraction;

    loop {
        state = match state {
            PipelineState::ContactExtraction => {
                let contact = extract_contact(llm, &request.cv_text).await?;
                PipelineState::Drafting { contact }
            }

            PipelineState::Drafting { contact } => {
                let prompt = build_generation_prompt(request);
                let draft: CvDraft =
                    call_json(llm, GENERATION_SYSTEM, &prompt, GENERATION_OPTIONS).await?;
                info!("[{run_id}] Draft generated ({} chars)", draft.markdown_cv.len());
                PipelineState::Validating {
                    contact,
                    candidate: Candidate {
                        body: draft.markdown_cv,
                        report: draft.optimization_report,
                    },
                    corrections: 0,
                }
            }

            PipelineState::Validating {
                contact,
                candidate,
                corrections,
            } => {
                let verdict = validate_draft(llm, &candidate.body, &contact, request).await?;
                let attempt = corrections + 1;

                if verdict.is_accepted() {
                    info!("[{run_id}] Attempt {attempt} accepted");
                    PipelineState::Accepted { contact, candidate }
                } else if corrections >= max_corrections {
                    warn!(
                        "[{run_id}] Attempt {attempt} rejected with {} violations; no corrections left",
                        verdict.violations.len()
                    );
                    return Err(exhausted(attempt, &verdict));
                } else {
                    warn!(
                        "[{run_id}] Attempt {}/{} rejected with {} violations; correcting",
                        attempt,
                        max_corrections + 1,
                        verdict.violations.len()
                    );
                    PipelineState::Correcting {
                        contact,
                        candidate,
                        corrections,
                        verdict,
                    }
                }
            }

            PipelineState::Correcting {
                contact,
                candidate,
                corrections,
                verdict,
            } => {
                let prompt = build_correction_prompt(&candidate.body, &verdict.violations, request);
                let corrected: CorrectedCv =
                    call_json(llm, CORRECTION_SYSTEM, &prompt, GENERATION_OPTIONS).await?;
                PipelineState::Validating {
                    contact,
                    candidate: Candidate {
                        body: corrected.markdown_cv,
                        report: corrected.optimization_report.or(candidate.report),
                    },
                    corrections: corrections + 1,
                }
            }

            PipelineState::Accepted { contact, candidate } => {
                info!("[{run_id}] CV generation finished");
                return Ok(FinalArtifact {
                    markdown_cv: assemble(&contact, &candidate.body),
                    optimization_report: candidate.report,
                });
            }
        };
    }
}

fn exhausted(attempts: u32, verdict: &ValidationVerdict) -> AppError {
    AppError::GenerationExhausted(format!(
        "CV generation failed validation after {attempts} attempt(s). Last violations: {}",
        verdict.violations.join("; ")
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
