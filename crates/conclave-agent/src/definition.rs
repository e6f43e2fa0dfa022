// ABOUTME: Agent definitions: immutable descriptors that know how to build their own
// ABOUTME: input from the blackboard and fold their output back into it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use conclave_core::{Blackboard, BlackboardError, FunctionSpec, Message};

use crate::io::{AgentInput, AgentOutput, FunctionAgentInput, GraphQlAgentInput};
use crate::prompts;
use crate::router::AgentDescription;

/// Errors raised by agent definitions. All of these are programming-contract
/// violations (wrong variant wiring), raised immediately and never recovered.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent '{agent}' paired with wrong blackboard variant: {source}")]
    ContractViolation {
        agent: String,
        #[source]
        source: BlackboardError,
    },

    #[error("agent '{agent}' received an output of the wrong variant")]
    OutputVariantMismatch { agent: String },
}

/// A function-call agent: declares the functions it understands (its own
/// outputs plus collaborators') and the subset it may generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionAgentDefinition {
    pub agent_name: String,
    pub description: String,
    /// The 'input' function calls this agent understands. Understanding a
    /// subset of other agents' output is what lets agents collaborate.
    pub accepted_functions: Vec<FunctionSpec>,
    /// The 'output' function calls this agent generates.
    pub functions_allowed_to_generate: Vec<FunctionSpec>,
    /// The agent only generates if the user mentioned one of these topics.
    pub topics: Vec<String>,
}

impl FunctionAgentDefinition {
    pub fn accepted_function_names(&self) -> Vec<String> {
        self.accepted_functions
            .iter()
            .map(|f| f.function_name.clone())
            .collect()
    }
}

/// A GraphQL agent: declares the schemas it accepts as input and the mutation
/// schemas it may generate against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlAgentDefinition {
    pub agent_name: String,
    pub description: String,
    pub accepted_graphql_schemas: Vec<String>,
    pub mutations_allowed_to_generate: Vec<String>,
    pub topics: Vec<String>,
}

/// The closed set of agent variants. One instance per agent per process,
/// immutable configuration, not tied to a single conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentDefinition {
    FunctionCall(FunctionAgentDefinition),
    GraphQl(GraphQlAgentDefinition),
}

impl AgentDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::FunctionCall(d) => &d.agent_name,
            Self::GraphQl(d) => &d.agent_name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::FunctionCall(d) => &d.description,
            Self::GraphQl(d) => &d.description,
        }
    }

    pub fn topics(&self) -> &[String] {
        match self {
            Self::FunctionCall(d) => &d.topics,
            Self::GraphQl(d) => &d.topics,
        }
    }

    /// The routing-facing description of this agent.
    pub fn describe(&self) -> AgentDescription {
        AgentDescription {
            agent_name: self.name().to_string(),
            description: self.description().to_string(),
            topics: self.topics().to_vec(),
        }
    }

    /// The rendered system prompt for invoking this agent.
    pub fn system_prompt(&self) -> String {
        match self {
            Self::FunctionCall(d) => prompts::function_agent_system_prompt(d).render(),
            Self::GraphQl(d) => prompts::graphql_agent_system_prompt(d).render(),
        }
    }

    /// Build this agent's input: the rewritten prompt plus the slice of the
    /// blackboard it accepts. Pairing with the wrong blackboard variant is a
    /// contract violation.
    pub fn build_input(
        &self,
        rewritten_user_prompt: &str,
        blackboard: &Blackboard,
    ) -> Result<AgentInput, AgentError> {
        match self {
            Self::FunctionCall(d) => {
                let board = blackboard
                    .as_function_call()
                    .map_err(|source| AgentError::ContractViolation {
                        agent: d.agent_name.clone(),
                        source,
                    })?;
                let previously_generated_functions =
                    board.get_functions_matching(&d.accepted_function_names());
                tracing::debug!(
                    agent = %d.agent_name,
                    prior_calls = previously_generated_functions.len(),
                    "built function agent input"
                );
                Ok(AgentInput::FunctionCall(FunctionAgentInput {
                    user_input: rewritten_user_prompt.to_string(),
                    functions_allowed_to_generate: d.functions_allowed_to_generate.clone(),
                    previously_generated_functions,
                }))
            }
            Self::GraphQl(d) => {
                let board = blackboard
                    .as_graphql()
                    .map_err(|source| AgentError::ContractViolation {
                        agent: d.agent_name.clone(),
                        source,
                    })?;
                let previously_generated_mutations =
                    board.get_mutations_matching(&d.accepted_graphql_schemas);
                tracing::debug!(
                    agent = %d.agent_name,
                    prior_mutations = previously_generated_mutations.len(),
                    "built graphql agent input"
                );
                Ok(AgentInput::GraphQl(GraphQlAgentInput {
                    user_input: rewritten_user_prompt.to_string(),
                    accepted_graphql_schemas: d.accepted_graphql_schemas.clone(),
                    mutations_allowed_to_generate: d.mutations_allowed_to_generate.clone(),
                    previously_generated_mutations,
                    graphql_data: board.user_data().to_string(),
                    topics: d.topics.clone(),
                }))
            }
        }
    }

    /// Fold an agent's output back into the blackboard: the generated calls
    /// or mutations, plus its chat message. An output of the wrong variant is
    /// a contract violation, never silently coerced.
    pub fn update_blackboard(
        &self,
        output: &AgentOutput,
        blackboard: &mut Blackboard,
    ) -> Result<(), AgentError> {
        match (self, output) {
            (Self::FunctionCall(d), AgentOutput::FunctionCall(out)) => {
                let board = blackboard
                    .as_function_call_mut()
                    .map_err(|source| AgentError::ContractViolation {
                        agent: d.agent_name.clone(),
                        source,
                    })?;
                board.add_generated_functions(out.generated_function_calls.clone());
                board.add_message(Message::assistant(&out.chat_message));
                Ok(())
            }
            (Self::GraphQl(d), AgentOutput::GraphQl(out)) => {
                let board = blackboard
                    .as_graphql_mut()
                    .map_err(|source| AgentError::ContractViolation {
                        agent: d.agent_name.clone(),
                        source,
                    })?;
                board.add_generated_mutations(out.generated_mutations.clone());
                board.add_message(Message::assistant(&out.chat_message));
                Ok(())
            }
            _ => Err(AgentError::OutputVariantMismatch {
                agent: self.name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{FunctionAgentOutput, GraphQlAgentOutput};
    use conclave_core::{FunctionCall, ParameterSpec, ParameterType};
    use serde_json::json;

    fn spec(name: &str) -> FunctionSpec {
        FunctionSpec::new(
            name,
            "test function",
            vec![ParameterSpec::new("name", ParameterType::String)],
        )
        .unwrap()
    }

    fn creature_agent() -> AgentDefinition {
        AgentDefinition::FunctionCall(FunctionAgentDefinition {
            agent_name: "Creature Creator".into(),
            description: "Creates new creatures.".into(),
            accepted_functions: vec![spec("AddCreature"), spec("AddCreatureRelationship")],
            functions_allowed_to_generate: vec![spec("AddCreature")],
            topics: vec!["creature".into()],
        })
    }

    fn graphql_agent() -> AgentDefinition {
        AgentDefinition::GraphQl(GraphQlAgentDefinition {
            agent_name: "Creature Creator".into(),
            description: "Creates new creatures.".into(),
            accepted_graphql_schemas: vec![
                "type Mutation {\n  addCreature(input: CreatureInput!): Creature!\n}\n".into(),
            ],
            mutations_allowed_to_generate: vec![
                "type Mutation {\n  addCreature(input: CreatureInput!): Creature!\n}\n".into(),
            ],
            topics: vec!["creature".into()],
        })
    }

    #[test]
    fn build_input_pulls_accepted_slice() {
        let agent = creature_agent();
        let mut board = Blackboard::new_function_call();
        {
            let inner = board.as_function_call_mut().unwrap();
            inner.add_generated_functions(vec![
                FunctionCall::new("AddCreature").with_argument("name", json!("sheep")),
                FunctionCall::new("AddVegetation").with_argument("name", json!("grass")),
                FunctionCall::new("AddCreatureRelationship"),
            ]);
        }

        let input = agent.build_input("Create a sheep", &board).unwrap();
        match input {
            AgentInput::FunctionCall(input) => {
                assert_eq!(input.user_input, "Create a sheep");
                // AddVegetation is not in the accepted set.
                assert_eq!(input.previously_generated_functions.len(), 2);
                assert_eq!(
                    input.previously_generated_functions[0].function_name,
                    "AddCreature"
                );
                assert_eq!(
                    input.previously_generated_functions[1].function_name,
                    "AddCreatureRelationship"
                );
            }
            other => panic!("expected FunctionCall input, got {:?}", other),
        }
    }

    #[test]
    fn build_input_graphql_includes_user_data_and_matching_mutations() {
        let agent = graphql_agent();
        let mut board = Blackboard::new_graphql();
        {
            let inner = board.as_graphql_mut().unwrap();
            inner.set_user_data("{\"creatures\":[]}");
            inner.add_generated_mutations(vec![
                "mutation { addCreature(input: {}) { id } }".into(),
                "mutation { addVegetation(input: {}) { id } }".into(),
            ]);
        }

        let input = agent.build_input("Create a sheep", &board).unwrap();
        match input {
            AgentInput::GraphQl(input) => {
                assert_eq!(input.graphql_data, "{\"creatures\":[]}");
                assert_eq!(input.previously_generated_mutations.len(), 1);
                assert!(input.previously_generated_mutations[0].contains("addCreature"));
            }
            other => panic!("expected GraphQl input, got {:?}", other),
        }
    }

    #[test]
    fn build_input_wrong_blackboard_is_contract_violation() {
        let agent = creature_agent();
        let board = Blackboard::new_graphql();
        let result = agent.build_input("Create a sheep", &board);
        assert!(matches!(result, Err(AgentError::ContractViolation { .. })));
    }

    #[test]
    fn update_blackboard_appends_calls_and_message() {
        let agent = creature_agent();
        let mut board = Blackboard::new_function_call();

        let output = AgentOutput::FunctionCall(FunctionAgentOutput {
            chat_message: "Added a sheep.".into(),
            generated_function_calls: vec![FunctionCall::new("AddCreature")],
        });
        agent.update_blackboard(&output, &mut board).unwrap();

        let inner = board.as_function_call().unwrap();
        assert_eq!(inner.all_function_calls().len(), 1);
        assert_eq!(inner.new_function_calls().len(), 1);
        assert_eq!(inner.new_messages().len(), 1);
        assert_eq!(inner.new_messages()[0].message, "Added a sheep.");
    }

    #[test]
    fn update_blackboard_wrong_output_variant_is_contract_violation() {
        let agent = creature_agent();
        let mut board = Blackboard::new_function_call();
        let output = AgentOutput::GraphQl(GraphQlAgentOutput {
            chat_message: "wrong".into(),
            generated_mutations: vec![],
        });

        let result = agent.update_blackboard(&output, &mut board);
        assert!(matches!(
            result,
            Err(AgentError::OutputVariantMismatch { .. })
        ));
        // The failed update left nothing behind.
        let inner = board.as_function_call().unwrap();
        assert!(inner.all_function_calls().is_empty());
        assert!(inner.all_messages().is_empty());
    }

    #[test]
    fn describe_carries_name_description_topics() {
        let desc = creature_agent().describe();
        assert_eq!(desc.agent_name, "Creature Creator");
        assert_eq!(desc.topics, vec!["creature"]);
        assert!(!desc.description.is_empty());
    }
}
