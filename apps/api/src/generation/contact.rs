//! Contact extraction — runs once per generation run, on the top of the original CV only.

use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{build_contact_prompt, CONTACT_SYSTEM};
use crate::llm_client::{call_json, CallOptions, ChatBackend};
use crate::models::resume::ContactInfo;

/// Contact blocks sit at the top of a CV.
pub const CONTACT_WINDOW_CHARS: usize = 600;

const CONTACT_OPTIONS: CallOptions = CallOptions::json(0.0);

/// First `CONTACT_WINDOW_CHARS` characters of the CV, cut on a char boundary.
pub fn contact_window(cv_text: &str) -> &str {
    let cv_text = cv_text.trim_start();
    match cv_text.char_indices().nth(CONTACT_WINDOW_CHARS) {
        Some((idx, _)) => &cv_text[..idx],
        None => cv_text,
    }
}

pub async fn extract_contact(llm: &dyn ChatBackend, cv_text: &str) -> Result<ContactInfo, AppError> {
    let prompt = build_contact_prompt(contact_window(cv_text));
    let contact: ContactInfo = call_json(llm, CONTACT_SYSTEM, &prompt, CONTACT_OPTIONS).await?;
    let contact = contact.normalized();

    info!(
        "Extracted contact block (title={}, email={}, phone={}, location={}, linkedin={}, portfolio={})",
        contact.title.is_some(),
        contact.email.is_some(),
        contact.phone.is_some(),
        contact.location.is_some(),
        contact.linkedin.is_some(),
        contact.portfolio.is_some()
    );
    Ok(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedBackend;

    #[test]
    fn test_window_is_bounded() {
        let cv = "a".repeat(2000);
        assert_eq!(contact_window(&cv).len(), CONTACT_WINDOW_CHARS);
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        let cv = "é".repeat(1000);
        let window = contact_window(&cv);
        assert_eq!(window.chars().count(), CONTACT_WINDOW_CHARS);
    }

    #[test]
    fn test_short_cv_is_returned_whole() {
        assert_eq!(contact_window("  Jane Doe, jane@x.com"), "Jane Doe, jane@x.com");
    }

    #[tokio::test]
    async fn test_extract_contact_sends_only_the_window() {
        let cv = format!("Jane Doe, Backend Engineer, jane@x.com\n{}SECRET_BODY_MARKER", "x".repeat(700));
        let backend = ScriptedBackend::new([
            r#"{"name": "Jane Doe", "title": "Backend Engineer", "email": "jane@x.com", "phone": null}"#,
        ]);

        let contact = extract_contact(&backend, &cv).await.unwrap();

        assert_eq!(contact.name, "Jane Doe");
        assert_eq!(contact.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(contact.phone, None);
        let prompt = &backend.calls()[0].prompt;
        assert!(prompt.contains("jane@x.com"));
        assert!(!prompt.contains("SECRET_BODY_MARKER"));
    }

    #[tokio::test]
    async fn test_missing_name_is_parse_error() {
        let backend = ScriptedBackend::new([r#"{"name": "", "email": "jane@x.com"}"#]);
        let err = extract_contact(&backend, "jane@x.com").await.unwrap_err();
        match err {
            AppError::ResponseParse(e) => assert_eq!(e.schema, "contact-info"),
            other => panic!("expected ResponseParse, got {other:?}"),
        }
    }
}
