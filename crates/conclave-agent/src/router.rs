// ABOUTME: The router: maps a free-text user prompt to an ordered execution plan of
// ABOUTME: recommended agents, each with a prompt rewritten to suit that agent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use conclave_core::Message;

use crate::client::{CompletionRequest, LlmClient, LlmError, complete_typed};
use crate::config::GeneratorConfig;
use crate::prompts;

/// Reserved name of the synthetic fallback agent. A plan step naming it is a
/// no-op; real agents must never use this name.
pub const CHAT_AGENT_NAME: &str = "chat";

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("router input could not be serialized: {0}")]
    InputSerialization(#[from] serde_json::Error),

    #[error("recommended agent '{0}' is not in the candidate list")]
    UnknownAgent(String),
}

/// Routing-facing description of one agent: name, purpose, and the topics it
/// declares interest in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDescription {
    pub agent_name: String,
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// One recommended step: an agent plus the user's prompt rewritten for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAgent {
    pub agent_name: String,
    pub rewritten_user_prompt: String,
}

/// The router's output: a chat response plus the ordered agents to execute.
/// Order is a first-class signal; the plan is produced fresh per invocation
/// and may be cached and replayed by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub chat_message: String,
    #[serde(default)]
    pub recommended_agents: Vec<RecommendedAgent>,
}

/// What the router reasons over: the prompt, the candidate agents, and
/// optionally the prior plan and message history for iterative refinement.
#[derive(Debug, Clone, Serialize)]
struct RouterInput<'a> {
    user_prompt: &'a str,
    agent_descriptions: &'a [AgentDescription],
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_plan: Option<&'a ExecutionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_history: Option<&'a [Message]>,
}

fn chat_agent_description(description: &str) -> AgentDescription {
    AgentDescription {
        agent_name: CHAT_AGENT_NAME.to_string(),
        description: description.to_string(),
        topics: Vec::new(),
    }
}

/// The full candidate list: the provided agents plus the synthetic chat
/// fallback.
pub fn build_candidates(
    agent_descriptions: &[AgentDescription],
    chat_agent_description_text: &str,
) -> Vec<AgentDescription> {
    let mut candidates = agent_descriptions.to_vec();
    candidates.push(chat_agent_description(chat_agent_description_text));
    candidates
}

/// Produce an execution plan for the user's prompt. Stateless: everything the
/// router needs is passed in. The returned plan is the reasoning capability's
/// output verbatim; the caller decides whether to execute it.
pub async fn generate_plan(
    client: &dyn LlmClient,
    config: &GeneratorConfig,
    user_prompt: &str,
    agent_descriptions: &[AgentDescription],
    chat_agent_description_text: &str,
    previous_plan: Option<&ExecutionPlan>,
    message_history: Option<&[Message]>,
) -> Result<ExecutionPlan, RouterError> {
    let candidates = build_candidates(agent_descriptions, chat_agent_description_text);
    let input = RouterInput {
        user_prompt,
        agent_descriptions: &candidates,
        previous_plan,
        message_history,
    };

    let request = CompletionRequest {
        system_prompt: prompts::router_system_prompt().render(),
        user_message: serde_json::to_string(&input)?,
        max_tokens: config.max_tokens,
    };

    tracing::info!(
        candidates = candidates.len(),
        refining = previous_plan.is_some(),
        "routing user prompt"
    );
    if config.is_debug {
        tracing::debug!(input = %request.user_message, "router request");
    }
    let plan: ExecutionPlan = complete_typed(client, &request).await?;
    tracing::info!(
        recommended = plan.recommended_agents.len(),
        "router produced plan"
    );
    Ok(plan)
}

/// Check that every recommended agent is a known candidate (or the reserved
/// chat fallback). An unknown name is a routing error and aborts the turn; an
/// empty recommendation list is a valid terminal outcome.
pub fn validate_plan(
    plan: &ExecutionPlan,
    agent_descriptions: &[AgentDescription],
) -> Result<(), RouterError> {
    for recommended in &plan.recommended_agents {
        let known = recommended.agent_name == CHAT_AGENT_NAME
            || agent_descriptions
                .iter()
                .any(|d| d.agent_name == recommended.agent_name);
        if !known {
            return Err(RouterError::UnknownAgent(recommended.agent_name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubLlmClient;
    use serde_json::json;

    fn descriptions() -> Vec<AgentDescription> {
        vec![
            AgentDescription {
                agent_name: "Creature Creator".into(),
                description: "Creates creatures".into(),
                topics: vec!["creature".into()],
            },
            AgentDescription {
                agent_name: "Vegetation Creator".into(),
                description: "Creates vegetation".into(),
                topics: vec!["vegetation".into()],
            },
        ]
    }

    #[test]
    fn candidates_include_chat_fallback_last() {
        let candidates = build_candidates(&descriptions(), "General ecosystem chat");
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[2].agent_name, CHAT_AGENT_NAME);
        assert_eq!(candidates[2].description, "General ecosystem chat");
        assert!(candidates[2].topics.is_empty());
    }

    #[test]
    fn validate_accepts_known_agents_and_chat() {
        let plan = ExecutionPlan {
            chat_message: "On it.".into(),
            recommended_agents: vec![
                RecommendedAgent {
                    agent_name: "Creature Creator".into(),
                    rewritten_user_prompt: "Create a cow".into(),
                },
                RecommendedAgent {
                    agent_name: CHAT_AGENT_NAME.into(),
                    rewritten_user_prompt: "Explain what happened".into(),
                },
            ],
        };
        assert!(validate_plan(&plan, &descriptions()).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_agent() {
        let plan = ExecutionPlan {
            chat_message: "On it.".into(),
            recommended_agents: vec![RecommendedAgent {
                agent_name: "Weather Controller".into(),
                rewritten_user_prompt: "Make it rain".into(),
            }],
        };
        let result = validate_plan(&plan, &descriptions());
        assert!(matches!(result, Err(RouterError::UnknownAgent(name)) if name == "Weather Controller"));
    }

    #[test]
    fn empty_plan_is_valid() {
        let plan = ExecutionPlan {
            chat_message: "Nothing to do.".into(),
            recommended_agents: vec![],
        };
        assert!(validate_plan(&plan, &descriptions()).is_ok());
    }

    #[tokio::test]
    async fn generate_plan_sends_candidates_and_parses_output() {
        let client = StubLlmClient::with_responses(vec![json!({
            "chat_message": "I'll create the cow.",
            "recommended_agents": [
                {"agent_name": "Creature Creator", "rewritten_user_prompt": "Create a cow"}
            ]
        })]);
        let config = GeneratorConfig::default();

        let plan = generate_plan(
            &client,
            &config,
            "Add a cow",
            &descriptions(),
            "General ecosystem chat",
            None,
            None,
        )
        .await
        .unwrap();

        assert_eq!(plan.recommended_agents.len(), 1);
        assert_eq!(plan.recommended_agents[0].agent_name, "Creature Creator");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        // The serialized router input carries all candidates including chat.
        assert!(requests[0].user_message.contains("Creature Creator"));
        assert!(requests[0].user_message.contains("\"chat\""));
        assert!(requests[0].system_prompt.contains("router bot"));
    }

    #[tokio::test]
    async fn generate_plan_includes_previous_plan_when_refining() {
        let client = StubLlmClient::with_responses(vec![json!({
            "chat_message": "Swapped the sheep for a goat.",
            "recommended_agents": []
        })]);
        let config = GeneratorConfig::default();
        let previous = ExecutionPlan {
            chat_message: "Adding a sheep.".into(),
            recommended_agents: vec![RecommendedAgent {
                agent_name: "Creature Creator".into(),
                rewritten_user_prompt: "Create a sheep".into(),
            }],
        };
        let history = vec![Message::user("Add a sheep")];

        generate_plan(
            &client,
            &config,
            "Actually make it a goat",
            &descriptions(),
            "General ecosystem chat",
            Some(&previous),
            Some(&history),
        )
        .await
        .unwrap();

        let request = &client.requests()[0];
        assert!(request.user_message.contains("previous_plan"));
        assert!(request.user_message.contains("Create a sheep"));
        assert!(request.user_message.contains("message_history"));
    }
}
