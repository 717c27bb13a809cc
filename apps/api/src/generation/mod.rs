// CV generation: contact extraction, drafting, validation and the correction loop.
// All LLM calls go through llm_client; the header is rendered here, never by the model.

pub mod assembler;
pub mod contact;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod validation;
