// Gap Analysis: diffs job requirements against the CV and asks the candidate
// clarifying questions before generation.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
