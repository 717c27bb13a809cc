//! Response validation: strict decoding of extracted model output into typed schemas.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::llm_client::extract::extract_structured;

/// A structured shape the model is asked to produce.
///
/// `check` carries rules serde cannot express (e.g. non-empty required strings).
pub trait ResponseSchema: DeserializeOwned {
    const NAME: &'static str;

    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// The model's output did not match the expected schema.
/// Carries the raw text so the failure can be diagnosed from logs or the error body.
#[derive(Debug, Error)]
#[error("Failed to parse {schema} response: {reason}")]
pub struct ResponseParseError {
    pub schema: &'static str,
    pub raw_output: String,
    pub reason: String,
}

/// Extracts the JSON payload from raw model text and decodes it as `T`.
pub fn parse_response<T: ResponseSchema>(raw: &str) -> Result<T, ResponseParseError> {
    decode(extract_structured(raw), raw)
}

/// Decodes an already-extracted payload. `raw` is kept only for diagnostics.
pub fn decode<T: ResponseSchema>(payload: &str, raw: &str) -> Result<T, ResponseParseError> {
    let fail = |reason: String| ResponseParseError {
        schema: T::NAME,
        raw_output: raw.to_string(),
        reason,
    };

    let value: T = serde_json::from_str(payload).map_err(|e| fail(e.to_string()))?;
    value.check().map_err(fail)?;
    Ok(value)
}
