// ABOUTME: System prompt assembly for the router and both agent variants.
// ABOUTME: Prompts are built from background / steps / output-instruction sections.

use crate::definition::{FunctionAgentDefinition, GraphQlAgentDefinition};

/// A sectioned system prompt. Rendered as headed lists so every agent gets
/// the same predictable structure.
#[derive(Debug, Clone, Default)]
pub struct SystemPrompt {
    pub background: Vec<String>,
    pub steps: Vec<String>,
    pub output_instructions: Vec<String>,
}

impl SystemPrompt {
    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        if !self.background.is_empty() {
            sections.push(render_section("BACKGROUND", &self.background));
        }
        if !self.steps.is_empty() {
            sections.push(render_section("STEPS", &self.steps));
        }
        if !self.output_instructions.is_empty() {
            sections.push(render_section("OUTPUT INSTRUCTIONS", &self.output_instructions));
        }
        sections.join("\n\n")
    }
}

fn render_section(title: &str, items: &[String]) -> String {
    let mut lines = vec![format!("# {title}")];
    for item in items {
        lines.push(format!("- {item}"));
    }
    lines.join("\n")
}

/// Instruction appended to every prompt so providers without a JSON response
/// mode still emit a parseable object.
const JSON_ONLY: &str =
    "Respond with a single JSON object matching the output schema. No prose outside the JSON.";

/// System prompt for the router.
pub fn router_system_prompt() -> SystemPrompt {
    SystemPrompt {
        background: vec![
            "You are a router bot that recommends the most suitable of the available AI agents to handle the user's prompt.".into(),
        ],
        steps: vec![
            "For each agent, consider whether it needs to be run to fulfill the user's prompt.".into(),
            "Only select agents that are really relevant to the user's prompt.".into(),
            "If you find no suitable agent, then default to the 'chat' agent.".into(),
            "Order the selected agents so that agents which create entities run before agents that relate or depend on those entities.".into(),
            "For each selected agent, rewrite the user's prompt to suit that agent.".into(),
        ],
        output_instructions: vec![
            "Take the user prompt and match it to a sequence of one or more of the available agents. If no suitable agent is available, use the 'chat' agent.".into(),
            "Return a 'chat_message' for the user and a 'recommended_agents' list of {agent_name, rewritten_user_prompt}.".into(),
            JSON_ONLY.into(),
        ],
    }
}

/// System prompt for a function-call agent, embedding the functions it is
/// allowed to generate and the topics it is scoped to.
pub fn function_agent_system_prompt(definition: &FunctionAgentDefinition) -> SystemPrompt {
    let allowed = definition
        .functions_allowed_to_generate
        .iter()
        .map(|f| {
            serde_json::to_string(f).unwrap_or_else(|_| f.function_name.clone())
        })
        .collect::<Vec<_>>()
        .join("\n  ");

    SystemPrompt {
        background: vec![
            format!("You are an agent named '{}'. {}", definition.agent_name, definition.description),
            format!("You may ONLY generate calls to these functions:\n  {allowed}"),
            format!("You only generate if the user's prompt concerns one of these topics: {}.", definition.topics.join(", ")),
        ],
        steps: vec![
            "Read the previously generated function calls: they are the current state of the world.".into(),
            "Generate the function calls needed to satisfy the user's prompt, without duplicating existing state.".into(),
        ],
        output_instructions: vec![
            "Return a 'chat_message' summarizing what you did and a 'generated_function_calls' list of {function_name, arguments}.".into(),
            "Respect each parameter's allowed_values where given.".into(),
            JSON_ONLY.into(),
        ],
    }
}

/// System prompt for a GraphQL agent, embedding the mutation schemas it is
/// allowed to generate against.
pub fn graphql_agent_system_prompt(definition: &GraphQlAgentDefinition) -> SystemPrompt {
    SystemPrompt {
        background: vec![
            format!("You are an agent named '{}'. {}", definition.agent_name, definition.description),
            format!(
                "You may ONLY generate GraphQL mutation calls declared in these schemas:\n{}",
                definition.mutations_allowed_to_generate.join("\n")
            ),
            format!("You only generate if the user's prompt concerns one of these topics: {}.", definition.topics.join(", ")),
        ],
        steps: vec![
            "Read graphql_data and the previously generated mutations: together they are the current state of the world.".into(),
            "Generate the mutation calls needed to satisfy the user's prompt, without duplicating existing state.".into(),
        ],
        output_instructions: vec![
            "Return a 'chat_message' summarizing what you did and a 'generated_mutations' list of raw mutation call strings.".into(),
            JSON_ONLY.into(),
        ],
    }
}
