// Shared prompt constants and prompt-building utilities.
// Each stage that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

use crate::models::gap::UserAnswer;
use crate::models::language::Language;

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Never invent facts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY facts stated in the ORIGINAL CV or in the CANDIDATE ANSWERS. \
    Do NOT invent employers, titles, dates, degrees, certifications, technologies, metrics or \
    achievements. If a detail is not supported by those sources, leave it out.";

/// Never shorten or drop factual content; only add, reorder or enrich.
pub const PRESERVATION_INSTRUCTION: &str = "\
    CRITICAL: NEVER shorten, merge away or remove a factual bullet from the original CV. \
    You may only ADD new bullets, REORDER bullets, or ENRICH a bullet with details from the \
    candidate answers. A rewritten bullet must be at least as informative as the original.";

/// Mirror the job description's exact wording for skills the candidate actually has.
pub const TERMINOLOGY_INSTRUCTION: &str = "\
    When the candidate demonstrably has a skill the job description asks for, use the EXACT \
    term from the job description (same spelling, casing and acronym, e.g. 'Kubernetes', not \
    'K8s'). Never claim a job-description skill the sources do not support.";

/// Output-language rule for every stage that emits prose.
pub fn language_instruction(language: Language) -> String {
    format!(
        "LANGUAGE: Write every heading, sentence and bullet EXCLUSIVELY in {name}. \
        Do NOT mix languages. Translate content from the sources into {name} when needed, \
        but keep proper nouns, company names and technology names unchanged.",
        name = language.display_name()
    )
}

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted text is never rescanned, so user content containing `{cv_text}` or
/// similar stays literal. Braces that do not name a known placeholder (JSON schema
/// examples) are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let matched = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });

        match matched {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Renders candidate answers as `Q:`/`A:` pairs for prompt context.
pub fn render_answers(answers: &[UserAnswer]) -> String {
    let rendered: Vec<String> = answers
        .iter()
        .filter(|a| !a.answer.trim().is_empty())
        .map(|a| format!("Q: {}\nA: {}", a.question.trim(), a.answer.trim()))
        .collect();

    if rendered.is_empty() {
        "(The candidate provided no additional answers.)".to_string()
    } else {
        rendered.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_single_pass() {
        let filled = fill_template(
            "A: {a}\nB: {b}\nA again: {a}",
            &[("a", "contains {b}"), ("b", "two")],
        );
        assert_eq!(filled, "A: contains {b}\nB: two\nA again: contains {b}");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template("{\n  \"name\": \"{x}\"\n} {unknown}", &[("x", "v")]);
        assert_eq!(filled, "{\n  \"name\": \"v\"\n} {unknown}");
    }

    #[test]
    fn test_render_answers_pairs() {
        let answers = vec![
            UserAnswer {
                question: "Redis?".to_string(),
                answer: "Used Redis for caching at Acme Corp, reduced latency 40%".to_string(),
            },
            UserAnswer {
                question: "Skipped?".to_string(),
                answer: "  ".to_string(),
            },
        ];
        let rendered = render_answers(&answers);
        assert_eq!(
            rendered,
            "Q: Redis?\nA: Used Redis for caching at Acme Corp, reduced latency 40%"
        );
    }

    #[test]
    fn test_render_answers_empty() {
        assert!(render_answers(&[]).contains("no additional answers"));
    }

    #[test]
    fn test_language_instruction_names_language() {
        let text = language_instruction(Language::BrazilianPortuguese);
        assert!(text.contains("Brazilian Portuguese"));
        assert!(text.contains("Do NOT mix languages"));
    }
}
