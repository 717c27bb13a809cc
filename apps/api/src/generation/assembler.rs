//! Artifact assembly — deterministic header from `ContactInfo` + generated body verbatim.
//!
//! Contact data never passes through the model's output, so it cannot be
//! hallucinated or dropped.

use crate::models::resume::ContactInfo;

const CHANNEL_SEPARATOR: &str = " | ";

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Prepends `https://` unless the value already carries an http(s) scheme.
fn web_url(value: &str) -> String {
    let lowered = value.to_ascii_lowercase();
    if lowered.starts_with("https://") || lowered.starts_with("http://") {
        value.to_string()
    } else {
        format!("https://{value}")
    }
}

/// Renders the header block. Absent fields leave no line, label or separator behind.
pub fn render_header(contact: &ContactInfo) -> String {
    let mut lines = vec![format!("# {}", contact.name.trim())];

    if let Some(title) = present(&contact.title) {
        lines.push(format!("### {title}"));
    }

    let mut channels = Vec::new();
    if let Some(email) = present(&contact.email) {
        let address = email.strip_prefix("mailto:").unwrap_or(email);
        channels.push(format!("📧 [{address}](mailto:{address})"));
    }
    if let Some(phone) = present(&contact.phone) {
        channels.push(format!("📱 {phone}"));
    }
    if let Some(location) = present(&contact.location) {
        channels.push(format!("📍 {location}"));
    }
    if let Some(linkedin) = present(&contact.linkedin) {
        channels.push(format!("🔗 [LinkedIn]({})", web_url(linkedin)));
    }
    if let Some(portfolio) = present(&contact.portfolio) {
        channels.push(format!("🌐 [Portfolio]({})", web_url(portfolio)));
    }
    if !channels.is_empty() {
        lines.push(channels.join(CHANNEL_SEPARATOR));
    }

    lines.join("\n")
}

/// Header, blank line, then the body exactly as generated.
pub fn assemble(contact: &ContactInfo, body: &str) -> String {
    format!("{}\n\n{}", render_header(contact), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_contact() -> ContactInfo {
        ContactInfo {
            name: "Jane Doe".to_string(),
            title: Some("Backend Engineer".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: Some("+49 30 1234567".to_string()),
            location: Some("Berlin, Germany".to_string()),
            linkedin: Some("linkedin.com/in/janedoe".to_string()),
            portfolio: Some("https://jane.dev".to_string()),
        }
    }

    #[test]
    fn test_full_header_layout() {
        assert_eq!(
            render_header(&full_contact()),
            "# Jane Doe\n\
             ### Backend Engineer\n\
             📧 [jane@x.com](mailto:jane@x.com) | 📱 +49 30 1234567 | 📍 Berlin, Germany | \
             🔗 [LinkedIn](https://linkedin.com/in/janedoe) | 🌐 [Portfolio](https://jane.dev)"
        );
    }

    #[test]
    fn test_name_only_has_no_stray_lines() {
        let contact = ContactInfo {
            name: "Jane Doe".to_string(),
            ..Default::default()
        };
        assert_eq!(render_header(&contact), "# Jane Doe");
    }

    #[test]
    fn test_absent_fields_leave_no_separators() {
        let contact = ContactInfo {
            name: "Jane Doe".to_string(),
            email: Some("jane@x.com".to_string()),
            phone: Some("   ".to_string()),
            portfolio: Some("jane.dev".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render_header(&contact),
            "# Jane Doe\n📧 [jane@x.com](mailto:jane@x.com) | 🌐 [Portfolio](https://jane.dev)"
        );
    }

    #[test]
    fn test_header_is_deterministic() {
        let contact = full_contact();
        assert_eq!(render_header(&contact), render_header(&contact.clone()));
    }

    #[test]
    fn test_existing_scheme_is_kept() {
        assert_eq!(web_url("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(web_url("github.com/jane"), "https://github.com/jane");
    }

    #[test]
    fn test_assemble_keeps_body_verbatim() {
        let body = "## Summary\n  Indented text with trailing spaces  \n";
        let document = assemble(&full_contact(), body);
        assert!(document.ends_with(body));
        assert!(document.starts_with("# Jane Doe\n"));
        assert!(document.contains("\n\n## Summary"));
    }
}
