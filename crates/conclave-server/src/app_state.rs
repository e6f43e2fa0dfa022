// ABOUTME: Shared application state for the conclave HTTP server.
// ABOUTME: Holds the LLM client and generator configuration behind an Arc for Axum handlers.

use std::sync::Arc;

use conclave_agent::{GeneratorConfig, LlmClient};

/// Shared application state accessible by all Axum handlers. The server is
/// stateless across requests; conversation state travels in request bodies.
pub struct AppState {
    pub client: Arc<dyn LlmClient>,
    pub config: GeneratorConfig,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(client: Arc<dyn LlmClient>, config: GeneratorConfig) -> Self {
        Self { client, config }
    }
}
