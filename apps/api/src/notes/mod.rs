// Note generation: subject extraction, template dispatch and prompt assembly.
// All upstream calls go through llm_client, no direct Anthropic calls here.

pub mod builder;
pub mod handlers;
pub mod prompts;
pub mod subject;
pub mod templates;
