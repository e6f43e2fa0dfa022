// ABOUTME: Provider module aggregating all LLM client adapters.
// ABOUTME: Each sub-module implements LlmClient for a specific LLM API.

pub mod anthropic;
pub mod openai;

use serde_json::Value;

use crate::client::{LlmClient, LlmError};
use crate::config::GeneratorConfig;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

/// Build the provider adapter named by the configuration. API keys and
/// endpoint overrides come from the provider's own environment variables.
pub fn create_client(config: &GeneratorConfig) -> Result<Box<dyn LlmClient>, LlmError> {
    match config.provider.as_str() {
        "anthropic" => Ok(Box::new(AnthropicClient::from_env(config.model.clone())?)),
        "openai" => Ok(Box::new(OpenAiClient::from_env(config.model.clone())?)),
        other => Err(LlmError::Provider(format!("unknown provider: {other}"))),
    }
}

/// Strip a Markdown code fence wrapping, if present. Models sometimes wrap
/// their JSON in ```json fences despite instructions.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((first_line, rest)) if first_line.trim().chars().all(char::is_alphanumeric) => {
            rest.trim()
        }
        _ => inner.trim(),
    }
}

/// Parse the model's text output as a JSON object, tolerating code fences.
pub(crate) fn parse_model_text(text: &str) -> Result<Value, LlmError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(cleaned)
        .map_err(|e| LlmError::MalformedOutput(format!("model output is not valid JSON: {e}")))
}
