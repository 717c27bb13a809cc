// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::generation::validation::{MIN_BULLET_CHARS, MIN_EXPERIENCE_BULLETS};
use crate::llm_client::prompts::{
    fill_template, language_instruction, render_answers, GROUNDING_INSTRUCTION,
    JSON_ONLY_SYSTEM, PRESERVATION_INSTRUCTION, TERMINOLOGY_INSTRUCTION,
};
use crate::models::language::{Language, Section};
use crate::models::resume::GenerationRequest;

// ────────────────────────────────────────────────────────────────────────────
// Contact extraction
// ────────────────────────────────────────────────────────────────────────────

pub const CONTACT_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Replace: {cv_head}
pub const CONTACT_PROMPT_TEMPLATE: &str = r#"Extract the candidate's contact details from the top of their CV.

Return a JSON object with this EXACT schema:
{
  "name": "string (required) — full name",
  "title": "string or null — current professional title / headline",
  "email": "string or null",
  "phone": "string or null",
  "location": "string or null — city, country",
  "linkedin": "string or null — LinkedIn URL or handle",
  "portfolio": "string or null — personal site, GitHub or portfolio URL"
}

RULES:
1. Copy values EXACTLY as written. Do NOT guess, complete or reformat them.
2. Use null for anything not present in the text.

CV (beginning):
{cv_head}"#;

pub fn build_contact_prompt(cv_head: &str) -> String {
    fill_template(CONTACT_PROMPT_TEMPLATE, &[("cv_head", cv_head.trim())])
}

// ────────────────────────────────────────────────────────────────────────────
// CV generation
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for CV generation — enforces JSON-only output.
pub const GENERATION_SYSTEM: &str = "You are an expert Resume Writer who tailors resumes to \
    a specific job without ever inventing facts. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences around the JSON.";

/// CV generation prompt template.
/// Replace: {grounding_instruction}, {preservation_instruction}, {terminology_instruction},
///          {structure_rules}, {language_instruction}, {job_description}, {cv_text}, {answers}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Rewrite the candidate's CV so it matches the Job Description as closely as the facts allow, incorporating the new information from the candidate's answers.

Return a JSON object with this EXACT schema (no extra fields):
{
  "markdown_cv": "string — the resume BODY in Markdown (see STRUCTURE)",
  "optimization_report": "string — short Markdown list of what was improved and why"
}

{grounding_instruction}

{preservation_instruction}

{terminology_instruction}

{structure_rules}

{language_instruction}

SELF-CHECK before answering:
1. Every section above appears exactly once, in order, and no other section exists.
2. Every experience entry has the heading line, the date line and enough bullets of sufficient length.
3. Every original bullet is still present and at least as detailed as before.
4. Every fact can be traced to the ORIGINAL CV or the CANDIDATE ANSWERS.
5. Every piece of information from the candidate answers was placed in the matching experience entry.
6. The whole text is written in one language only.

JOB DESCRIPTION:
{job_description}

ORIGINAL CV:
{cv_text}

CANDIDATE ANSWERS:
{answers}"#;

/// Shared body-layout rules used by generation, structure checking and correction.
pub fn structure_rules(language: Language) -> String {
    let headings = language.headings();
    let experience = language.heading(Section::Experience);
    let education = language.heading(Section::Education);

    format!(
        r####"STRUCTURE (mandatory):
- The body contains EXACTLY these sections, each once, in this order, as level-2 headings: {list}.
- NO other sections. NO name heading, title line, email, phone, location or links — the contact header is added separately.
- Layout:
## {summary}
A 2–4 sentence professional summary aimed at the target role.
## {skills}
- **Category:** skill, skill, skill
## {experience}
### Job Title | Company | Location
Start – End
- Bullet point
- Bullet point
- Bullet point
## {education}
### Degree | Institution | Location
Start – End
- In "{experience}", every entry uses exactly that sub-structure: a "### Title | Company | Location" line, then one date-range line, then at least {min_bullets} bullet points ("- ") of at least {min_chars} characters each.
- NEVER write prose paragraphs inside "{experience}"; bullets only.
- "{education}" lists degrees only, using the same heading style."####,
        list = headings
            .iter()
            .map(|h| format!("\"## {h}\""))
            .collect::<Vec<_>>()
            .join(", "),
        summary = headings[0],
        skills = headings[1],
        experience = experience,
        education = education,
        min_bullets = MIN_EXPERIENCE_BULLETS,
        min_chars = MIN_BULLET_CHARS,
    )
}

pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    let language = request.language();
    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("preservation_instruction", PRESERVATION_INSTRUCTION),
            ("terminology_instruction", TERMINOLOGY_INSTRUCTION),
            ("structure_rules", structure_rules(language).as_str()),
            ("language_instruction", language_instruction(language).as_str()),
            ("job_description", request.job_description.trim()),
            ("cv_text", request.cv_text.trim()),
            ("answers", render_answers(&request.user_answers).as_str()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

pub const VALIDATION_SYSTEM: &str = "You are a meticulous resume auditor. \
    You check documents against explicit rules and report every violation. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object.";

const VERDICT_SCHEMA: &str = r#"Return a JSON object with this EXACT schema:
{
  "valid": true or false,
  "violations": ["string — one concrete, actionable violation per item"],
  "reasoning": "string — one short paragraph"
}
"valid" MUST be false whenever "violations" is not empty."#;

/// Structure check prompt template.
/// Replace: {verdict_schema}, {structure_rules}, {language}, {body}
pub const STRUCTURE_CHECK_PROMPT_TEMPLATE: &str = r#"Check the resume body below against the STRUCTURE rules and the language rule.

{verdict_schema}

{structure_rules}

LANGUAGE RULE: every heading, sentence and bullet must be written in {language}. Any heading or sentence in another language is a violation (proper nouns and technology names are fine).

Report each broken rule as a separate violation. Do NOT judge content quality or truthfulness.

RESUME BODY:
{body}"#;

pub fn build_structure_check_prompt(body: &str, language: Language) -> String {
    fill_template(
        STRUCTURE_CHECK_PROMPT_TEMPLATE,
        &[
            ("verdict_schema", VERDICT_SCHEMA),
            ("structure_rules", structure_rules(language).as_str()),
            ("language", language.display_name()),
            ("body", body.trim()),
        ],
    )
}

/// Integrity check prompt template.
/// Replace: {verdict_schema}, {language}, {cv_text}, {answers}, {body}
pub const INTEGRITY_CHECK_PROMPT_TEMPLATE: &str = r#"Check the GENERATED RESUME BODY for factual integrity against its sources: the ORIGINAL CV and the CANDIDATE ANSWERS.

{verdict_schema}

A violation is any of:
1. A fabricated fact: an employer, title, date, degree, certification, technology, metric or achievement that appears in neither source.
2. A factual bullet from the ORIGINAL CV that was removed, or rewritten so that it carries less information.
3. A skill claimed in the body that neither source supports.
4. Information from the CANDIDATE ANSWERS attributed to the wrong company or project.
5. Text not written in {language} (proper nouns and technology names are fine).

Translation into {language} and rewording that keeps the facts are NOT violations.
Quote the offending text in each violation.

ORIGINAL CV:
{cv_text}

CANDIDATE ANSWERS:
{answers}

GENERATED RESUME BODY:
{body}"#;

pub fn build_integrity_check_prompt(body: &str, request: &GenerationRequest) -> String {
    fill_template(
        INTEGRITY_CHECK_PROMPT_TEMPLATE,
        &[
            ("verdict_schema", VERDICT_SCHEMA),
            ("language", request.language().display_name()),
            ("cv_text", request.cv_text.trim()),
            ("answers", render_answers(&request.user_answers).as_str()),
            ("body", body.trim()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Correction
// ────────────────────────────────────────────────────────────────────────────

pub const CORRECTION_SYSTEM: &str = GENERATION_SYSTEM;

/// Correction prompt template.
/// Replace: {violations}, {grounding_instruction}, {preservation_instruction},
///          {structure_rules}, {language_instruction}, {job_description}, {cv_text},
///          {answers}, {body}
pub const CORRECTION_PROMPT_TEMPLATE: &str = r#"The resume body below failed validation. Fix EVERY violation listed and change nothing else.

VIOLATIONS:
{violations}

Return a JSON object with this EXACT schema (no extra fields):
{
  "markdown_cv": "string — the corrected resume BODY in Markdown",
  "optimization_report": "string — short Markdown list of what was improved and why"
}

{grounding_instruction}

{preservation_instruction}

{structure_rules}

{language_instruction}

Return the body only — never a name heading or contact details. Keep every fact of the previous body unless a violation says it is fabricated.

JOB DESCRIPTION:
{job_description}

ORIGINAL CV:
{cv_text}

CANDIDATE ANSWERS:
{answers}

PREVIOUS RESUME BODY:
{body}"#;

pub fn build_correction_prompt(
    body: &str,
    violations: &[String],
    request: &GenerationRequest,
) -> String {
    let language = request.language();
    let violations = violations
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}. {}", i + 1, v))
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        CORRECTION_PROMPT_TEMPLATE,
        &[
            ("violations", violations.as_str()),
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("preservation_instruction", PRESERVATION_INSTRUCTION),
            ("structure_rules", structure_rules(language).as_str()),
            ("language_instruction", language_instruction(language).as_str()),
            ("job_description", request.job_description.trim()),
            ("cv_text", request.cv_text.trim()),
            ("answers", render_answers(&request.user_answers).as_str()),
            ("body", body.trim()),
        ],
    )
}
