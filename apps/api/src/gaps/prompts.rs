// All LLM prompt constants for the Gap Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{fill_template, language_instruction};
use crate::models::language::Language;

pub const MIN_QUESTIONS: usize = 4;
pub const MAX_QUESTIONS: usize = 7;

/// System prompt for gap analysis — enforces JSON-only output.
pub const GAP_ANALYSIS_SYSTEM: &str = "You are an expert Technical Recruiter helping a \
    candidate tailor their resume to a specific job. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Gap analysis prompt template.
/// Replace: {min_questions}, {max_questions}, {language_instruction},
///          {job_description}, {cv_text}
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Compare the CV against the Job Description and find the gaps: hard skills, soft skills, tools or experiences the job requires that the CV does NOT clearly demonstrate.

Return a JSON object with this EXACT schema (no extra fields):
{
  "items": [
    {
      "question": "string — one rich question for the candidate",
      "context": "string — which job requirement this covers and why it is missing from the CV"
    }
  ]
}

RULES:
1. Return between {min_questions} and {max_questions} items, most important gap first.
2. Each question MUST be a single rich question that asks for ALL of:
   a) the specific skill or technology (use the exact name from the Job Description),
   b) the project or company where it was used,
   c) the candidate's ownership level (led, built alone, contributed as part of a team),
   d) any quantifiable outcome (numbers, percentages, time or money saved).
   Example: "The role requires Kubernetes. Have you deployed or operated services on Kubernetes (or a similar orchestrator)? If so, at which company or project, what exactly did you own, and what measurable result did it have?"
3. Do NOT ask about requirements the CV already clearly demonstrates.
4. If the CV is missing contact details (email, phone, location, LinkedIn or portfolio link), add ONE question asking the candidate to provide the missing ones.
5. Do NOT repeat a question or ask two questions about the same requirement.
6. {language_instruction}

JOB DESCRIPTION:
{job_description}

CV TEXT:
{cv_text}"#;

/// Fills the gap analysis template.
pub fn build_gap_analysis_prompt(cv_text: &str, job_description: &str, language: Language) -> String {
    fill_template(
        GAP_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("min_questions", MIN_QUESTIONS.to_string().as_str()),
            ("max_questions", MAX_QUESTIONS.to_string().as_str()),
            ("language_instruction", language_instruction(language).as_str()),
            ("job_description", job_description.trim()),
            ("cv_text", cv_text.trim()),
        ],
    )
}
