// ABOUTME: Generation endpoint: executes one full turn over function-call agents,
// ABOUTME: accumulating into the posted blackboard and returning the updated state.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use conclave_agent::{
    AgentDefinition, ExecutionPlan, FunctionAgentDefinition, GenerateError, RouterError, run_turn,
};
use conclave_core::{Blackboard, FunctionCall, FunctionCallBlackboard, Message};

use crate::app_state::SharedState;

#[derive(Debug, Deserialize)]
pub struct GenerateFunctionCallsRequest {
    pub agent_definitions: Vec<FunctionAgentDefinition>,
    pub chat_agent_description: String,
    pub user_prompt: String,
    /// The caller's conversation state. Omitted on the first turn.
    #[serde(default)]
    pub blackboard: Option<FunctionCallBlackboard>,
    /// A previously routed plan to execute as-is, skipping routing.
    #[serde(default)]
    pub execution_plan: Option<ExecutionPlan>,
}

#[derive(Debug, Serialize)]
pub struct GenerateFunctionCallsResponse {
    pub blackboard: FunctionCallBlackboard,
    pub new_function_calls: Vec<FunctionCall>,
    pub new_messages: Vec<Message>,
}

/// POST /api/generate_function_calls - Run one turn and return the updated blackboard.
pub async fn generate_function_calls(
    State(state): State<SharedState>,
    Json(request): Json<GenerateFunctionCallsRequest>,
) -> impl IntoResponse {
    let definitions: Vec<AgentDefinition> = request
        .agent_definitions
        .into_iter()
        .map(AgentDefinition::FunctionCall)
        .collect();
    let blackboard = request.blackboard.map(Blackboard::FunctionCall);

    let result = run_turn(
        state.client.as_ref(),
        &state.config,
        &definitions,
        &request.chat_agent_description,
        &request.user_prompt,
        blackboard,
        request.execution_plan,
    )
    .await;

    let board = match result {
        Ok(board) => board,
        Err(
            e @ (GenerateError::NoAgentDefinitions
            | GenerateError::ReservedAgentName
            | GenerateError::Routing(RouterError::UnknownAgent(_))),
        ) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": format!("{e}") })),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("{e}") })),
            )
                .into_response();
        }
    };

    // Definitions are all function-call agents, so the board is too.
    let inner = match board.as_function_call() {
        Ok(inner) => inner.clone(),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("{e}") })),
            )
                .into_response();
        }
    };

    let response = GenerateFunctionCallsResponse {
        new_function_calls: inner.new_function_calls().to_vec(),
        new_messages: inner.new_messages().to_vec(),
        blackboard: inner,
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::routes::create_router;
    use axum::body::Body;
    use conclave_agent::GeneratorConfig;
    use conclave_agent::testing::StubLlmClient;
    use conclave_core::{FunctionSpec, ParameterSpec, ParameterType};
    use http::Request;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with(client: Arc<dyn conclave_agent::LlmClient>) -> SharedState {
        Arc::new(AppState::new(client, GeneratorConfig::default()))
    }

    fn creature_definition() -> serde_json::Value {
        let spec = FunctionSpec::new(
            "AddCreature",
            "Adds a new creature",
            vec![ParameterSpec::new("creature_name", ParameterType::String)],
        )
        .unwrap();
        json!({
            "agent_name": "Creature Creator",
            "description": "Creates creatures",
            "accepted_functions": [spec.clone()],
            "functions_allowed_to_generate": [spec],
            "topics": ["creature"]
        })
    }

    async fn post(app: axum::Router, body: serde_json::Value) -> http::Response<axum::body::Body> {
        app.oneshot(
            Request::post("/api/generate_function_calls")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn generate_function_calls_runs_a_full_turn() {
        let client = Arc::new(StubLlmClient::with_responses(vec![
            json!({
                "chat_message": "Routing to the creature agent.",
                "recommended_agents": [
                    {"agent_name": "Creature Creator", "rewritten_user_prompt": "Create a cow"}
                ]
            }),
            json!({
                "chat_message": "Added a cow.",
                "generated_function_calls": [
                    {"function_name": "AddCreature", "arguments": {"creature_name": "cow"}}
                ]
            }),
        ]));
        let app = create_router(state_with(client));

        let resp = post(
            app,
            json!({
                "agent_definitions": [creature_definition()],
                "chat_agent_description": "General ecosystem chat",
                "user_prompt": "Add a cow"
            }),
        )
        .await;

        assert_eq!(resp.status(), 200);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let new_calls = parsed["new_function_calls"].as_array().unwrap();
        assert_eq!(new_calls.len(), 1);
        assert_eq!(new_calls[0]["function_name"], "AddCreature");
        // The returned blackboard can be posted back on the next turn.
        let board: FunctionCallBlackboard =
            serde_json::from_value(parsed["blackboard"].clone()).unwrap();
        assert_eq!(board.all_function_calls().len(), 1);
    }

    #[tokio::test]
    async fn generate_function_calls_accumulates_into_posted_blackboard() {
        let client = Arc::new(StubLlmClient::with_responses(vec![
            json!({
                "chat_message": "Routing.",
                "recommended_agents": [
                    {"agent_name": "Creature Creator", "rewritten_user_prompt": "Create a sheep"}
                ]
            }),
            json!({
                "chat_message": "Added a sheep.",
                "generated_function_calls": [
                    {"function_name": "AddCreature", "arguments": {"creature_name": "sheep"}}
                ]
            }),
        ]));
        let app = create_router(state_with(client));

        let mut prior = FunctionCallBlackboard::new();
        prior.add_generated_functions(vec![
            FunctionCall::new("AddCreature").with_argument("creature_name", json!("cow")),
        ]);

        let resp = post(
            app,
            json!({
                "agent_definitions": [creature_definition()],
                "chat_agent_description": "General ecosystem chat",
                "user_prompt": "Add a sheep",
                "blackboard": prior
            }),
        )
        .await;

        assert_eq!(resp.status(), 200);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

        // Prior call survives; only this turn's call is new.
        let board: FunctionCallBlackboard =
            serde_json::from_value(parsed["blackboard"].clone()).unwrap();
        assert_eq!(board.all_function_calls().len(), 2);
        assert_eq!(parsed["new_function_calls"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generate_function_calls_rejects_empty_definitions() {
        let app = create_router(state_with(Arc::new(StubLlmClient::with_responses(vec![]))));

        let resp = post(
            app,
            json!({
                "agent_definitions": [],
                "chat_agent_description": "General chat",
                "user_prompt": "Add a cow"
            }),
        )
        .await;

        assert_eq!(resp.status(), 422);
    }
}
