use serde::{Deserialize, Serialize};

use crate::llm_client::schema::ResponseSchema;
use crate::models::gap::UserAnswer;
use crate::models::language::Language;

/// Request body for CV generation. Immutable for the whole pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub cv_text: String,
    pub job_description: String,
    #[serde(default)]
    pub user_answers: Vec<UserAnswer>,
    pub language: Option<Language>,
}

impl GenerationRequest {
    pub fn language(&self) -> Language {
        self.language.unwrap_or_default()
    }
}

/// Contact block extracted from the top of the original CV.
/// The header of the final document is rendered from this, never from generated text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
}

impl ContactInfo {
    /// Trims every field and turns blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        fn clean(field: Option<String>) -> Option<String> {
            field
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
        }

        ContactInfo {
            name: self.name.trim().to_string(),
            title: clean(self.title),
            email: clean(self.email),
            phone: clean(self.phone),
            location: clean(self.location),
            linkedin: clean(self.linkedin),
            portfolio: clean(self.portfolio),
        }
    }
}

impl ResponseSchema for ContactInfo {
    const NAME: &'static str = "contact-info";

    fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("field `name` must not be empty".to_string());
        }
        Ok(())
    }
}

/// First draft returned by the generation stage. `markdown_cv` is the resume body only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvDraft {
    pub markdown_cv: String,
    #[serde(default)]
    pub optimization_report: Option<String>,
}

impl ResponseSchema for CvDraft {
    const NAME: &'static str = "cv-document";

    fn check(&self) -> Result<(), String> {
        if self.markdown_cv.trim().is_empty() {
            return Err("field `markdown_cv` must not be empty".to_string());
        }
        Ok(())
    }
}

/// Revised body returned by the correction stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectedCv {
    pub markdown_cv: String,
    /// Replaces the draft's report when present.
    #[serde(default)]
    pub optimization_report: Option<String>,
}

impl ResponseSchema for CorrectedCv {
    const NAME: &'static str = "cv-correction";

    fn check(&self) -> Result<(), String> {
        if self.markdown_cv.trim().is_empty() {
            return Err("field `markdown_cv` must not be empty".to_string());
        }
        Ok(())
    }
}

/// Outcome of one validation call. Consumed immediately by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    #[serde(default)]
    pub violations: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

impl ValidationVerdict {
    pub fn from_violations(violations: Vec<String>, reasoning: impl Into<String>) -> Self {
        ValidationVerdict {
            valid: violations.is_empty(),
            violations,
            reasoning: reasoning.into(),
        }
    }

    /// A rejection without listed violations carries its reasoning as the violation,
    /// so the corrector always has something concrete to fix.
    pub fn normalized(mut self) -> Self {
        if !self.valid && self.violations.is_empty() {
            let reasoning = self.reasoning.trim();
            self.violations.push(if reasoning.is_empty() {
                "The validator rejected the body without naming a violation".to_string()
            } else {
                reasoning.to_string()
            });
        }
        self
    }

    /// A verdict counts as passing only if it says so and lists nothing.
    pub fn is_accepted(&self) -> bool {
        self.valid && self.violations.is_empty()
    }

    /// Folds another verdict into this one, keeping violation order.
    pub fn merge(mut self, other: ValidationVerdict) -> Self {
        self.valid = self.is_accepted() && other.is_accepted();
        self.violations.extend(other.violations);
        if !other.reasoning.is_empty() {
            if !self.reasoning.is_empty() {
                self.reasoning.push_str(" | ");
            }
            self.reasoning.push_str(&other.reasoning);
        }
        self
    }
}

/// Terminal output of a generation run: header + validated body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalArtifact {
    pub markdown_cv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_report: Option<String>,
}
