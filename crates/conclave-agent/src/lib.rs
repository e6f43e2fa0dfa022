// ABOUTME: Agent system for conclave: routing user prompts to specialized agents and
// ABOUTME: driving them against a shared blackboard through an opaque LLM capability.

pub mod client;
pub mod config;
pub mod definition;
pub mod generator;
pub mod io;
pub mod prompts;
pub mod providers;
pub mod router;
pub mod testing;

pub use client::{CompletionRequest, LlmClient, LlmError};
pub use config::GeneratorConfig;
pub use definition::{AgentDefinition, AgentError, FunctionAgentDefinition, GraphQlAgentDefinition};
pub use generator::{GenerateError, TurnReport, generate, generate_with_routing, run_turn};
pub use io::{AgentOutput, FunctionAgentInput, FunctionAgentOutput, GraphQlAgentInput, GraphQlAgentOutput};
pub use providers::create_client;
pub use router::{AgentDescription, CHAT_AGENT_NAME, ExecutionPlan, RecommendedAgent, RouterError, generate_plan};
