// ABOUTME: The bundled ecosystem-simulation agents used by the REPL.
// ABOUTME: Three collaborating function-call agents: creatures, vegetation, relationships.

use conclave_agent::{AgentDefinition, FunctionAgentDefinition};
use conclave_core::{FunctionSpec, ParameterSpec, ParameterType};

pub const CHAT_AGENT_DESCRIPTION: &str =
    "Handles users questions about an ecosystem game like Sim Life";

const CREATURE_ICONS: &[&str] = &[
    "sheep-icon",
    "wolf-icon",
    "grass-icon",
    "human-icon",
    "other-icon",
];
const TERRAIN_TYPES: &[&str] = &["mountain", "marsh", "prairie", "coast", "water"];

// Static data: names and parameters are fixed here, so the checked
// constructor has nothing to reject and struct literals keep this infallible.
fn add_creature() -> FunctionSpec {
    FunctionSpec {
        function_name: "AddCreature".into(),
        description: "Adds a new creature to the world (not vegetation)".into(),
        parameters: vec![
            ParameterSpec::new("creature_name", ParameterType::String),
            ParameterSpec::with_allowed_values("allowed_terrain", ParameterType::String, TERRAIN_TYPES),
            ParameterSpec::new("age", ParameterType::Int),
            ParameterSpec::with_allowed_values("icon_name", ParameterType::String, CREATURE_ICONS),
        ],
    }
}

fn add_vegetation() -> FunctionSpec {
    FunctionSpec {
        function_name: "AddVegetation".into(),
        description: "Adds new vegetation to the world".into(),
        parameters: vec![
            ParameterSpec::new("vegetation_name", ParameterType::String),
            ParameterSpec::with_allowed_values("icon_name", ParameterType::String, CREATURE_ICONS),
            ParameterSpec::with_allowed_values("allowed_terrain", ParameterType::String, TERRAIN_TYPES),
        ],
    }
}

fn add_relationship() -> FunctionSpec {
    FunctionSpec {
        function_name: "AddCreatureRelationship".into(),
        description: "Adds a new relationship between two creatures".into(),
        parameters: vec![
            ParameterSpec::new("from_name", ParameterType::String),
            ParameterSpec::new("to_name", ParameterType::String),
            ParameterSpec::with_allowed_values(
                "relationship_name",
                ParameterType::String,
                &["eats", "buys", "feeds", "sells"],
            ),
        ],
    }
}

/// The bundled agent set. Each agent accepts a subset of the others' output,
/// which is what lets them collaborate on one blackboard.
pub fn agents() -> Vec<AgentDefinition> {
    vec![
        AgentDefinition::FunctionCall(FunctionAgentDefinition {
            agent_name: "Creature Creator".into(),
            description: "Creates new creatures given the user prompt. Ensures that ALL creatures mentioned by the user are created.".into(),
            accepted_functions: vec![add_creature(), add_relationship()],
            functions_allowed_to_generate: vec![add_creature()],
            topics: vec!["creature".into()],
        }),
        AgentDefinition::FunctionCall(FunctionAgentDefinition {
            agent_name: "Vegetation Creator".into(),
            description: "Creates new vegetation matching the user prompt. IMPORTANT: Ensures that ALL vegetation and plants mentioned by the user are created.".into(),
            accepted_functions: vec![add_vegetation(), add_relationship()],
            functions_allowed_to_generate: vec![add_vegetation()],
            topics: vec!["vegetation".into()],
        }),
        AgentDefinition::FunctionCall(FunctionAgentDefinition {
            agent_name: "Relationship Creator".into(),
            description: "Creates new relationships between creatures given the user prompt".into(),
            accepted_functions: vec![add_creature(), add_vegetation(), add_relationship()],
            functions_allowed_to_generate: vec![add_relationship()],
            topics: vec!["relationship".into()],
        }),
    ]
}
