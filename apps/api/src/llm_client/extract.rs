//! Structured output extraction.
//!
//! Models wrap JSON in prose or markdown fences no matter how strongly the prompt
//! forbids it. This is a substring heuristic, not a parser: it assumes at most one
//! top-level object and no stray braces in the surrounding text.

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Returns the slice of `raw` believed to hold the JSON payload.
///
/// Priority (first match wins):
/// 1. trim
/// 2. interior of a ```json fenced block
/// 3. interior of any fenced block
/// 4. first `{` through last `}` inclusive
/// 5. the trimmed text unchanged (decoding will fail downstream)
pub fn extract_structured(raw: &str) -> &str {
    let text = raw.trim();

    let text = if let Some(inner) = fenced_interior(text, JSON_FENCE) {
        inner
    } else if let Some(inner) = fenced_interior(text, FENCE) {
        inner
    } else {
        text
    };

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Interior of the first block opened by `opener`, up to the next closing fence.
/// An unclosed fence runs to the end of the text.
fn fenced_interior<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    // Skip the info string of an untagged fence (e.g. "```JSON" or "```javascript").
    let rest = match rest.find('\n') {
        Some(newline) if opener == FENCE && !rest[..newline].contains('{') => &rest[newline..],
        _ => rest,
    };
    let inner = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(inner.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"items": [{"question": "Q?", "context": "C"}]}"#;

    #[test]
    fn test_json_fence_with_prose() {
        let raw = format!("Sure! Here is the result:\n```json\n{PAYLOAD}\n```\nLet me know.");
        assert_eq!(extract_structured(&raw), PAYLOAD);
    }

    #[test]
    fn test_untagged_fence_with_prose() {
        let raw = format!("Result below\n```\n{PAYLOAD}\n```\nThanks");
        assert_eq!(extract_structured(&raw), PAYLOAD);
    }

    #[test]
    fn test_other_tag_fence_is_treated_as_generic() {
        let raw = format!("```javascript\n{PAYLOAD}\n```");
        assert_eq!(extract_structured(&raw), PAYLOAD);
    }

    #[test]
    fn test_json_fence_wins_over_earlier_generic_fence() {
        let raw = format!("```\nnot it\n```\n```json\n{PAYLOAD}\n```");
        assert_eq!(extract_structured(&raw), PAYLOAD);
    }

    #[test]
    fn test_bare_object_with_preamble() {
        let raw = format!("  Here you go: {PAYLOAD} hope this helps  ");
        assert_eq!(extract_structured(&raw), PAYLOAD);
    }

    #[test]
    fn test_bare_object_is_returned_verbatim() {
        let raw = format!("\n\n{PAYLOAD}\n");
        assert_eq!(extract_structured(&raw), PAYLOAD);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let raw = format!("```json\n{PAYLOAD}");
        assert_eq!(extract_structured(&raw), PAYLOAD);
    }

    #[test]
    fn test_no_object_returns_trimmed_text() {
        assert_eq!(extract_structured("  I cannot help with that.  "), "I cannot help with that.");
    }

    #[test]
    fn test_reversed_braces_return_text() {
        assert_eq!(extract_structured("} oops {"), "} oops {");
    }

    #[test]
    fn test_markdown_inside_json_string_is_kept() {
        let payload = r###"{"markdown_cv": "## Summary\nBackend engineer", "optimization_report": "Added Redis"}"###;
        let raw = format!("```json\n{payload}\n```");
        assert_eq!(extract_structured(&raw), payload);
    }
}
