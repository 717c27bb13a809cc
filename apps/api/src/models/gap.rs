use serde::{Deserialize, Serialize};

use crate::models::language::Language;

/// One clarification question produced by gap analysis.
///
/// Older prompt revisions asked for a numeric `id`; it is ignored when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapItem {
    pub question: String,
    /// Why the question is asked.
    #[serde(alias = "reasoning")]
    pub context: String,
}

/// The candidate's answer to one gap question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question: String,
    pub answer: String,
}

/// Request body for gap analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct GapAnalysisRequest {
    pub cv_text: String,
    pub job_description: String,
    pub language: Option<Language>,
}

impl GapAnalysisRequest {
    pub fn language(&self) -> Language {
        self.language.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_item_ignores_synthetic_id() {
        let item: GapItem = serde_json::from_str(
            r#"{"id": 3, "question": "Have you used Kubernetes?", "context": "Required by the role"}"#,
        )
        .unwrap();
        assert_eq!(item.question, "Have you used Kubernetes?");
        assert_eq!(item.context, "Required by the role");
    }

    #[test]
    fn test_gap_item_accepts_reasoning_alias() {
        let item: GapItem =
            serde_json::from_str(r#"{"question": "Q?", "reasoning": "because"}"#).unwrap();
        assert_eq!(item.context, "because");
    }

    #[test]
    fn test_gap_request_defaults_language() {
        let request: GapAnalysisRequest =
            serde_json::from_str(r#"{"cv_text": "cv", "job_description": "jd"}"#).unwrap();
        assert_eq!(request.language(), Language::English);

        let request: GapAnalysisRequest = serde_json::from_str(
            r#"{"cv_text": "cv", "job_description": "jd", "language": null}"#,
        )
        .unwrap();
        assert_eq!(request.language(), Language::English);
    }
}
