// ABOUTME: Input and output schemas exchanged between the execution loop and agents.
// ABOUTME: Inputs carry the rewritten prompt plus a filtered slice of blackboard state.

use serde::{Deserialize, Serialize};

use conclave_core::{FunctionCall, FunctionSpec};

/// Input to a function-call agent: the rewritten user prompt, the functions
/// it may generate, and the slice of previously generated calls it accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionAgentInput {
    pub user_input: String,
    pub functions_allowed_to_generate: Vec<FunctionSpec>,
    pub previously_generated_functions: Vec<FunctionCall>,
}

/// What a function-call agent produces in one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionAgentOutput {
    pub chat_message: String,
    #[serde(default)]
    pub generated_function_calls: Vec<FunctionCall>,
}

/// Input to a GraphQL agent: prompt, accepted schemas, the mutations it may
/// generate, the matching slice of prior mutations, and the client's data
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlAgentInput {
    pub user_input: String,
    pub accepted_graphql_schemas: Vec<String>,
    pub mutations_allowed_to_generate: Vec<String>,
    pub previously_generated_mutations: Vec<String>,
    pub graphql_data: String,
    pub topics: Vec<String>,
}

/// What a GraphQL agent produces in one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlAgentOutput {
    pub chat_message: String,
    #[serde(default)]
    pub generated_mutations: Vec<String>,
}

/// Input to one agent invocation, matching the agent's variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentInput {
    FunctionCall(FunctionAgentInput),
    GraphQl(GraphQlAgentInput),
}

/// Output of one agent invocation. The execution loop deserializes into the
/// variant the agent definition expects; pairing it with the wrong blackboard
/// is a contract violation, never a silent coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    FunctionCall(FunctionAgentOutput),
    GraphQl(GraphQlAgentOutput),
}

impl AgentOutput {
    pub fn chat_message(&self) -> &str {
        match self {
            Self::FunctionCall(out) => &out.chat_message,
            Self::GraphQl(out) => &out.chat_message,
        }
    }
}
