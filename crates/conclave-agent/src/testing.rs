// ABOUTME: Test utilities for conclave-agent: scripted and failing LLM clients.
// ABOUTME: Used across the workspace to exercise routing and generation without API calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{CompletionRequest, LlmClient, LlmError};

/// A stub client that replays a scripted sequence of JSON responses, one per
/// `complete` call, in order. Running past the script is an error so tests
/// fail loudly when the loop makes more calls than expected.
pub struct StubLlmClient {
    responses: Mutex<VecDeque<Value>>,
    requests_seen: Mutex<Vec<CompletionRequest>>,
}

impl StubLlmClient {
    pub fn with_responses(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests_seen: Mutex::new(Vec::new()),
        }
    }

    /// The requests the client has received, for asserting on prompt content.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests_seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }

    /// Number of completions that have been consumed.
    pub fn calls_made(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl LlmClient for StubLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, LlmError> {
        if let Ok(mut seen) = self.requests_seen.lock() {
            seen.push(request.clone());
        }
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        next.ok_or_else(|| LlmError::Provider("stub script exhausted".to_string()))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// A client that always fails, for exercising failure-isolation paths.
pub struct FailingLlmClient;

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Value, LlmError> {
        Err(LlmError::Provider("simulated provider outage".to_string()))
    }

    fn provider_name(&self) -> &str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "failing-model"
    }
}
