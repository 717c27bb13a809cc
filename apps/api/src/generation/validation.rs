//! Draft validation — structure and integrity checks that decide accept vs. correct.
//!
//! The mechanical check runs first and costs nothing. Only a draft that passes it is
//! sent to the model-backed structure (language mixing, layout) and integrity
//! (fabrication, dropped bullets) checks.

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::prompts::{
    build_integrity_check_prompt, build_structure_check_prompt, VALIDATION_SYSTEM,
};
use crate::llm_client::schema::ResponseSchema;
use crate::llm_client::{call_json, CallOptions, ChatBackend};
use crate::models::language::{Language, Section};
use crate::models::resume::{ContactInfo, GenerationRequest, ValidationVerdict};

pub const MIN_EXPERIENCE_BULLETS: usize = 3;
pub const MIN_BULLET_CHARS: usize = 50;

const VALIDATION_OPTIONS: CallOptions = CallOptions::json(0.0);
const EXCERPT_CHARS: usize = 60;

// ────────────────────────────────────────────────────────────────────────────
// Model-backed verdict schemas
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct StructureCheck(pub ValidationVerdict);

impl ResponseSchema for StructureCheck {
    const NAME: &'static str = "structure-check";
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct IntegrityCheck(pub ValidationVerdict);

impl ResponseSchema for IntegrityCheck {
    const NAME: &'static str = "integrity-check";
}

// ────────────────────────────────────────────────────────────────────────────
// Mechanical structure check
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct ExperienceEntry {
    heading: String,
    date_line: Option<String>,
    bullets: Vec<String>,
    prose: Vec<String>,
}

impl ExperienceEntry {
    fn new(heading: &str) -> Self {
        Self {
            heading: heading.trim().to_string(),
            date_line: None,
            bullets: Vec::new(),
            prose: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        if let Some(bullet) = bullet_text(line) {
            self.bullets.push(bullet.to_string());
        } else if self.date_line.is_none() && self.bullets.is_empty() {
            self.date_line = Some(line.to_string());
        } else {
            self.prose.push(line.to_string());
        }
    }
}

fn bullet_text(line: &str) -> Option<&str> {
    ["- ", "* ", "• "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

fn heading_text(raw: &str) -> String {
    raw.trim().trim_end_matches('#').trim().to_string()
}

fn same_heading(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}…")
    }
}

/// Checks section layout without a model call.
///
/// - `##` headings are exactly the localized sections, once each, in order
/// - no `#` top-level heading (the name belongs to the header)
/// - every experience entry has a date line and ≥ MIN_EXPERIENCE_BULLETS bullets of
///   ≥ MIN_BULLET_CHARS characters, and no prose
pub fn check_structure(body: &str, language: Language) -> ValidationVerdict {
    let expected = language.headings();
    let experience = language.heading(Section::Experience);

    let mut violations = Vec::new();
    let mut found: Vec<String> = Vec::new();
    let mut entries: Vec<ExperienceEntry> = Vec::new();
    let mut in_experience = false;
    let mut stray_experience_text = false;
    let mut top_level_heading = false;

    for line in body.lines() {
        let line = line.trim();

        if let Some(raw) = line.strip_prefix("## ") {
            let heading = heading_text(raw);
            in_experience = same_heading(&heading, experience);
            found.push(heading);
            continue;
        }
        if line.starts_with("# ") {
            top_level_heading = true;
            continue;
        }
        if !in_experience || line.is_empty() {
            continue;
        }
        if let Some(raw) = line.strip_prefix("### ") {
            entries.push(ExperienceEntry::new(raw));
            continue;
        }
        match entries.last_mut() {
            Some(entry) => entry.push_line(line),
            None => stray_experience_text = true,
        }
    }

    if top_level_heading {
        violations.push(
            "The body must not contain a top-level '# ' heading; the name and contact header \
            are added separately"
                .to_string(),
        );
    }

    for heading in &expected {
        let count = found.iter().filter(|h| same_heading(h, heading)).count();
        match count {
            0 => violations.push(format!("Missing required section '## {heading}'")),
            1 => {}
            n => violations.push(format!(
                "Section '## {heading}' appears {n} times; it must appear exactly once"
            )),
        }
    }

    for heading in &found {
        if !expected.iter().any(|e| same_heading(e, heading)) {
            violations.push(format!(
                "Unexpected section '## {heading}'; only {} are allowed",
                expected
                    .iter()
                    .map(|h| format!("'## {h}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }

    if violations.is_empty() {
        let in_order = found
            .iter()
            .zip(expected.iter())
            .all(|(f, e)| same_heading(f, e));
        if !in_order {
            violations.push(format!(
                "Sections must appear in this order: {}",
                expected.join(", ")
            ));
        }
    }

    if stray_experience_text {
        violations.push(format!(
            "Section '## {experience}' contains text outside a '### Title | Company | Location' entry"
        ));
    }

    for entry in &entries {
        if entry.heading.split('|').filter(|p| !p.trim().is_empty()).count() < 2 {
            violations.push(format!(
                "Experience entry '{}' must use the heading format 'Title | Company | Location'",
                entry.heading
            ));
        }
        if entry.date_line.is_none() {
            violations.push(format!(
                "Experience entry '{}' is missing its date range line",
                entry.heading
            ));
        }
        if entry.bullets.len() < MIN_EXPERIENCE_BULLETS {
            violations.push(format!(
                "Experience entry '{}' has {} bullet points; at least {} are required",
                entry.heading,
                entry.bullets.len(),
                MIN_EXPERIENCE_BULLETS
            ));
        }
        for bullet in &entry.bullets {
            if bullet.chars().count() < MIN_BULLET_CHARS {
                violations.push(format!(
                    "Experience entry '{}' has a bullet shorter than {} characters: \"{}\"",
                    entry.heading,
                    MIN_BULLET_CHARS,
                    excerpt(bullet)
                ));
            }
        }
        for paragraph in &entry.prose {
            violations.push(format!(
                "Experience entry '{}' contains a prose paragraph; use bullet points only: \"{}\"",
                entry.heading,
                excerpt(paragraph)
            ));
        }
    }

    ValidationVerdict::from_violations(violations, "mechanical structure check")
}

/// The body must not repeat contact details; they live only in the header.
pub fn check_contact_leak(body: &str, contact: &ContactInfo) -> ValidationVerdict {
    let lowered = body.to_lowercase();
    let mut violations = Vec::new();

    if let Some(email) = contact.email.as_deref().filter(|e| !e.is_empty()) {
        if lowered.contains(&email.to_lowercase()) {
            violations.push(
                "The body repeats the candidate's email address; contact details belong only \
                in the header"
                    .to_string(),
            );
        }
    }
    if let Some(phone) = contact.phone.as_deref().filter(|p| !p.is_empty()) {
        if body.contains(phone) {
            violations.push(
                "The body repeats the candidate's phone number; contact details belong only \
                in the header"
                    .to_string(),
            );
        }
    }

    ValidationVerdict::from_violations(violations, "contact leak check")
}

// ────────────────────────────────────────────────────────────────────────────
// Model-backed checks
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_structure_check(
    llm: &dyn ChatBackend,
    body: &str,
    language: Language,
) -> Result<ValidationVerdict, AppError> {
    let prompt = build_structure_check_prompt(body, language);
    let StructureCheck(verdict) =
        call_json::<StructureCheck>(llm, VALIDATION_SYSTEM, &prompt, VALIDATION_OPTIONS).await?;
    Ok(verdict.normalized())
}

pub async fn run_integrity_check(
    llm: &dyn ChatBackend,
    body: &str,
    request: &GenerationRequest,
) -> Result<ValidationVerdict, AppError> {
    let prompt = build_integrity_check_prompt(body, request);
    let IntegrityCheck(verdict) =
        call_json::<IntegrityCheck>(llm, VALIDATION_SYSTEM, &prompt, VALIDATION_OPTIONS).await?;
    Ok(verdict.normalized())
}

/// Full validation of one draft body.
///
/// Mechanical failures short-circuit: the verdict goes straight back to the
/// orchestrator without spending model calls.
pub async fn validate_draft(
    llm: &dyn ChatBackend,
    body: &str,
    contact: &ContactInfo,
    request: &GenerationRequest,
) -> Result<ValidationVerdict, AppError> {
    let language = request.language();

    let local = check_structure(body, language).merge(check_contact_leak(body, contact));
    if !local.is_accepted() {
        debug!(
            "Mechanical validation found {} violations; skipping model checks",
            local.violations.len()
        );
        return Ok(local);
    }

    let structure = run_structure_check(llm, body, language).await?;
    let integrity = run_integrity_check(llm, body, request).await?;
    let verdict = structure.merge(integrity);

    info!(
        "Model validation: accepted={}, violations={}",
        verdict.is_accepted(),
        verdict.violations.len()
    );
    Ok(verdict)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedBackend;

    pub(crate) const VALID_BODY: &str = "\
## Summary
Backend engineer with 8 years of experience building payment systems in Go and Python.

## Skills
- **Languages:** Go, Python, SQL
- **Infrastructure:** Redis, PostgreSQL, Docker

## Experience
### Senior Backend Engineer | Acme Corp | Berlin, Germany
Jan 2020 – Present
- Built the Acme Corp payment system in Go, processing 2M transactions per day across 12 markets
- Introduced Redis caching for the Acme Corp payment system, reducing p99 latency by 40%
- Led the migration of 30 services from a monolith to containerized deployments on Docker

## Education
### B.Sc. Computer Science | Technical University of Berlin | Berlin
2012 – 2016
";

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Jane Doe".to_string(),
            email: Some("jane@x.com".to_string()),
            phone: Some("+49 30 1234567".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_body_passes() {
        let verdict = check_structure(VALID_BODY, Language::English);
        assert!(verdict.is_accepted(), "violations: {:?}", verdict.violations);
    }

    #[test]
    fn test_missing_section() {
        let body = VALID_BODY.replace("## Education", "## Certifications");
        let verdict = check_structure(&body, Language::English);
        assert!(!verdict.is_accepted());
        assert!(verdict
            .violations
            .iter()
            .any(|v| v == "Missing required section '## Education'"));
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.starts_with("Unexpected section '## Certifications'")));
    }

    #[test]
    fn test_duplicate_section() {
        let body = format!("{VALID_BODY}\n## Skills\n- Kubernetes\n");
        let verdict = check_structure(&body, Language::English);
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.contains("'## Skills' appears 2 times")));
    }

    #[test]
    fn test_wrong_order() {
        let body = VALID_BODY
            .replace("## Summary", "## TMP")
            .replace("## Skills", "## Summary")
            .replace("## TMP", "## Skills");
        let verdict = check_structure(&body, Language::English);
        assert_eq!(verdict.violations.len(), 1);
        assert!(verdict.violations[0].starts_with("Sections must appear in this order"));
    }

    #[test]
    fn test_headings_match_case_insensitively() {
        let body = VALID_BODY.replace("## Skills", "## SKILLS");
        assert!(check_structure(&body, Language::English).is_accepted());
    }

    #[test]
    fn test_localized_headings_required_for_language() {
        let verdict = check_structure(VALID_BODY, Language::BrazilianPortuguese);
        assert!(verdict
            .violations
            .iter()
            .any(|v| v == "Missing required section '## Resumo'"));
    }

    #[test]
    fn test_top_level_heading_is_rejected() {
        let body = format!("# Jane Doe\n{VALID_BODY}");
        let verdict = check_structure(&body, Language::English);
        assert!(verdict.violations[0].contains("top-level '# ' heading"));
    }

    #[test]
    fn test_too_few_and_short_bullets() {
        let body = VALID_BODY.replace(
            "- Led the migration of 30 services from a monolith to containerized deployments on Docker\n",
            "",
        );
        let body = body.replace(
            "- Introduced Redis caching for the Acme Corp payment system, reducing p99 latency by 40%",
            "- Added Redis",
        );
        let verdict = check_structure(&body, Language::English);
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.contains("has 2 bullet points; at least 3 are required")));
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.contains("shorter than 50 characters: \"Added Redis\"")));
    }

    #[test]
    fn test_prose_paragraph_in_experience() {
        let body = VALID_BODY.replace(
            "- Led the migration",
            "Responsible for many things across the platform.\n- Led the migration",
        );
        let verdict = check_structure(&body, Language::English);
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.contains("contains a prose paragraph")));
    }

    #[test]
    fn test_missing_date_line() {
        let body = VALID_BODY.replace("Jan 2020 – Present\n", "");
        let verdict = check_structure(&body, Language::English);
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.contains("missing its date range line")));
    }

    #[test]
    fn test_entry_heading_format() {
        let body = VALID_BODY.replace(
            "### Senior Backend Engineer | Acme Corp | Berlin, Germany",
            "### Senior Backend Engineer at Acme Corp",
        );
        let verdict = check_structure(&body, Language::English);
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.contains("'Title | Company | Location'")));
    }

    #[test]
    fn test_contact_leak() {
        let body = format!("{VALID_BODY}\nReach me at Jane@X.com");
        let verdict = check_contact_leak(&body, &contact());
        assert_eq!(verdict.violations.len(), 1);
        assert!(verdict.violations[0].contains("email"));
        assert!(check_contact_leak(VALID_BODY, &contact()).is_accepted());
    }

    #[tokio::test]
    async fn test_mechanical_failure_skips_model_checks() {
        let backend = ScriptedBackend::new(Vec::<String>::new());
        let request = GenerationRequest {
            cv_text: "cv".to_string(),
            job_description: "jd".to_string(),
            user_answers: vec![],
            language: None,
        };
        let verdict = validate_draft(&backend, "## Summary\nOnly this", &contact(), &request)
            .await
            .unwrap();
        assert!(!verdict.is_accepted());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_checks_are_merged() {
        let backend = ScriptedBackend::new([
            r#"{"valid": true, "violations": [], "reasoning": "layout ok"}"#,
            r#"{"valid": false, "violations": ["'2M transactions' is not in the sources"], "reasoning": "fabricated metric"}"#,
        ]);
        let request = GenerationRequest {
            cv_text: "cv".to_string(),
            job_description: "jd".to_string(),
            user_answers: vec![],
            language: None,
        };
        let verdict = validate_draft(&backend, VALID_BODY, &contact(), &request)
            .await
            .unwrap();
        assert!(!verdict.is_accepted());
        assert_eq!(verdict.violations, vec!["'2M transactions' is not in the sources"]);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_verdict_is_parse_error() {
        let backend = ScriptedBackend::new([r#"{"violations": []}"#]);
        let err = run_structure_check(&backend, VALID_BODY, Language::English)
            .await
            .unwrap_err();
        match err {
            AppError::ResponseParse(e) => assert_eq!(e.schema, "structure-check"),
            other => panic!("expected ResponseParse, got {other:?}"),
        }
    }
}
