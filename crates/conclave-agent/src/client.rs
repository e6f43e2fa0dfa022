// ABOUTME: The LlmClient trait that all provider adapters implement, plus the request
// ABOUTME: shape and error taxonomy for the reasoning-capability boundary.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A single structured completion request. The system prompt carries the
/// agent's schema instructions; the user message is the serialized input
/// schema for this invocation.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub max_tokens: u32,
}

/// Errors surfaced by a provider adapter. The core never retries; a failure
/// here is caught at the execution-loop level and the step produces nothing.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("rate limited")]
    RateLimited,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("malformed output: {0}")]
    MalformedOutput(String),
}

/// The opaque reasoning capability: given a structured input, produce a
/// structured (JSON) output. Implemented by provider adapters and by the
/// scripted stub in [`crate::testing`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion and return the parsed JSON output object.
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, LlmError>;

    /// Provider name for logging (e.g. "anthropic", "openai").
    fn provider_name(&self) -> &str;

    /// Model identifier in use.
    fn model_name(&self) -> &str;
}

/// Run a completion and deserialize the output into a typed schema.
pub async fn complete_typed<T: DeserializeOwned>(
    client: &dyn LlmClient,
    request: &CompletionRequest,
) -> Result<T, LlmError> {
    let value = client.complete(request).await?;
    serde_json::from_value(value)
        .map_err(|e| LlmError::MalformedOutput(format!("output did not match schema: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubLlmClient;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Reply {
        chat_message: String,
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "You are a test.".into(),
            user_message: "{}".into(),
            max_tokens: 64,
        }
    }

    #[tokio::test]
    async fn complete_typed_deserializes_output() {
        let client = StubLlmClient::with_responses(vec![json!({"chat_message": "hello"})]);
        let reply: Reply = complete_typed(&client, &request()).await.unwrap();
        assert_eq!(reply.chat_message, "hello");
    }

    #[tokio::test]
    async fn complete_typed_reports_schema_mismatch() {
        let client = StubLlmClient::with_responses(vec![json!({"unexpected": 1})]);
        let result: Result<Reply, _> = complete_typed(&client, &request()).await;
        assert!(matches!(result, Err(LlmError::MalformedOutput(_))));
    }
}
