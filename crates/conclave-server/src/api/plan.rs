// ABOUTME: Routing endpoint: maps a user prompt to an execution plan over the
// ABOUTME: posted agent descriptions, without executing anything.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use conclave_agent::{AgentDescription, ExecutionPlan, LlmError, RouterError};
use conclave_core::Message;

use crate::app_state::SharedState;

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub agent_descriptions: Vec<AgentDescription>,
    pub chat_agent_description: String,
    pub user_prompt: String,
    #[serde(default)]
    pub previous_plan: Option<ExecutionPlan>,
    #[serde(default)]
    pub message_history: Option<Vec<Message>>,
}

/// POST /api/generate_plan - Route the user prompt to recommended agents.
pub async fn generate_plan(
    State(state): State<SharedState>,
    Json(request): Json<GeneratePlanRequest>,
) -> impl IntoResponse {
    let plan = conclave_agent::generate_plan(
        state.client.as_ref(),
        &state.config,
        &request.user_prompt,
        &request.agent_descriptions,
        &request.chat_agent_description,
        request.previous_plan.as_ref(),
        request.message_history.as_deref(),
    )
    .await;

    match plan {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(RouterError::Llm(e @ LlmError::RateLimited)) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "error": format!("{e}") })),
        )
            .into_response(),
        Err(RouterError::Llm(e)) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": format!("{e}") })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("{e}") })),
        )
            .into_response(),
    }
}
