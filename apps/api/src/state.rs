use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::notes::builder::PromptBuilder;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. `LlmClient` in production, a stub in tests.
    pub generator: Arc<dyn TextGenerator>,
    pub prompts: Arc<PromptBuilder>,
}
