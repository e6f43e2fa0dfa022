// ABOUTME: The execution loop: drives a routed plan agent by agent, feeding each one
// ABOUTME: its slice of the blackboard and folding results back in, isolating failures.

use thiserror::Error;

use conclave_core::{Blackboard, Message};

use crate::client::{CompletionRequest, LlmClient, complete_typed};
use crate::config::GeneratorConfig;
use crate::definition::{AgentDefinition, AgentError};
use crate::io::AgentOutput;
use crate::router::{self, CHAT_AGENT_NAME, ExecutionPlan, RouterError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("expected at least one agent definition")]
    NoAgentDefinitions,

    #[error("agent name '{CHAT_AGENT_NAME}' is reserved for the fallback chat capability")]
    ReservedAgentName,

    #[error(transparent)]
    Routing(#[from] RouterError),

    #[error(transparent)]
    Contract(#[from] AgentError),

    #[error("agent input could not be serialized: {0}")]
    InputSerialization(#[from] serde_json::Error),
}

/// What happened during one executed turn: the plan that ran, which agents
/// updated the blackboard, and which steps were skipped after a failure.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub plan: ExecutionPlan,
    pub executed: Vec<String>,
    pub failed: Vec<String>,
}

/// Courtesy pause after every external call, success or failure alike.
async fn apply_delay(config: &GeneratorConfig) {
    if !config.delay_between_calls.is_zero() {
        tokio::time::sleep(config.delay_between_calls).await;
    }
}

fn find_definition<'a>(
    agent_definitions: &'a [AgentDefinition],
    name: &str,
) -> Option<&'a AgentDefinition> {
    agent_definitions.iter().find(|d| d.name() == name)
}

/// Execute a precomputed plan against the blackboard.
///
/// The plan is validated first: an unknown recommended agent aborts the whole
/// turn before any step runs. After that, steps execute strictly in plan
/// order. A step whose invocation fails is logged and skipped, leaving the
/// blackboard exactly as it was before that step, and the remaining
/// steps still run. Contract violations (variant cross-wiring) propagate
/// immediately; they are bugs, not runtime conditions.
pub async fn generate(
    client: &dyn LlmClient,
    config: &GeneratorConfig,
    agent_definitions: &[AgentDefinition],
    user_prompt: &str,
    blackboard: &mut Blackboard,
    plan: ExecutionPlan,
) -> Result<TurnReport, GenerateError> {
    let descriptions: Vec<_> = agent_definitions.iter().map(|d| d.describe()).collect();
    router::validate_plan(&plan, &descriptions)?;

    blackboard.add_message(Message::user(user_prompt));

    let mut executed = Vec::new();
    let mut failed = Vec::new();

    for step in &plan.recommended_agents {
        if step.agent_name == CHAT_AGENT_NAME {
            // The fallback has no structured action; its chat text is already
            // in the plan.
            tracing::debug!("skipping chat step");
            continue;
        }

        // Validation guarantees the definition exists.
        let Some(definition) = find_definition(agent_definitions, &step.agent_name) else {
            return Err(RouterError::UnknownAgent(step.agent_name.clone()).into());
        };

        tracing::info!(agent = %step.agent_name, "executing agent");
        let input = definition.build_input(&step.rewritten_user_prompt, blackboard)?;
        let request = CompletionRequest {
            system_prompt: definition.system_prompt(),
            user_message: serde_json::to_string(&input)?,
            max_tokens: config.max_tokens,
        };

        if config.is_debug {
            tracing::debug!(agent = %step.agent_name, input = %request.user_message, "agent request");
        }

        let output = match definition {
            AgentDefinition::FunctionCall(_) => complete_typed(client, &request)
                .await
                .map(AgentOutput::FunctionCall),
            AgentDefinition::GraphQl(_) => complete_typed(client, &request)
                .await
                .map(AgentOutput::GraphQl),
        };
        apply_delay(config).await;

        match output {
            Ok(output) => {
                definition.update_blackboard(&output, blackboard)?;
                tracing::info!(
                    agent = %step.agent_name,
                    chat_message = %output.chat_message(),
                    "agent step completed"
                );
                executed.push(step.agent_name.clone());
            }
            Err(e) => {
                // Failure isolation: this step produced nothing; the rest of
                // the plan still runs.
                tracing::warn!(agent = %step.agent_name, error = %e, "agent step failed, skipping");
                failed.push(step.agent_name.clone());
            }
        }
    }

    Ok(TurnReport {
        plan,
        executed,
        failed,
    })
}

/// Route the prompt first, then execute the resulting plan. A routing
/// failure aborts the turn before any step executes.
pub async fn generate_with_routing(
    client: &dyn LlmClient,
    config: &GeneratorConfig,
    agent_definitions: &[AgentDefinition],
    chat_agent_description: &str,
    user_prompt: &str,
    blackboard: &mut Blackboard,
) -> Result<TurnReport, GenerateError> {
    let descriptions: Vec<_> = agent_definitions.iter().map(|d| d.describe()).collect();
    let routed = router::generate_plan(
        client,
        config,
        user_prompt,
        &descriptions,
        chat_agent_description,
        None,
        Some(blackboard.all_messages()),
    )
    .await;
    apply_delay(config).await;
    let plan = routed?;

    generate(
        client,
        config,
        agent_definitions,
        user_prompt,
        blackboard,
        plan,
    )
    .await
}

/// The caller-facing surface for one conversation turn.
///
/// Accepts an optional blackboard (to resume a conversation) and an optional
/// precomputed plan (to skip routing). The newly-generated tracking is reset
/// up front in case the client did not, so the returned blackboard's "new"
/// subsets reflect exactly this turn.
///
/// A routing invocation failure is logged and the blackboard comes back
/// unchanged for the turn; partial per-step results are the norm, not an
/// error. Errors are reserved for contract violations and invalid wiring.
pub async fn run_turn(
    client: &dyn LlmClient,
    config: &GeneratorConfig,
    agent_definitions: &[AgentDefinition],
    chat_agent_description: &str,
    user_prompt: &str,
    blackboard: Option<Blackboard>,
    execution_plan: Option<ExecutionPlan>,
) -> Result<Blackboard, GenerateError> {
    let Some(first) = agent_definitions.first() else {
        return Err(GenerateError::NoAgentDefinitions);
    };
    if agent_definitions.iter().any(|d| d.name() == CHAT_AGENT_NAME) {
        return Err(GenerateError::ReservedAgentName);
    }

    let mut blackboard = blackboard.unwrap_or_else(|| match first {
        AgentDefinition::FunctionCall(_) => Blackboard::new_function_call(),
        AgentDefinition::GraphQl(_) => Blackboard::new_graphql(),
    });
    blackboard.reset_newly_generated();

    let result = match execution_plan {
        Some(plan) => {
            generate(
                client,
                config,
                agent_definitions,
                user_prompt,
                &mut blackboard,
                plan,
            )
            .await
        }
        None => {
            generate_with_routing(
                client,
                config,
                agent_definitions,
                chat_agent_description,
                user_prompt,
                &mut blackboard,
            )
            .await
        }
    };

    match result {
        Ok(report) => {
            tracing::info!(
                executed = report.executed.len(),
                failed = report.failed.len(),
                "turn complete"
            );
            Ok(blackboard)
        }
        // The router producing nothing is a terminal outcome for the turn,
        // not an error the caller has to unwind: they get their blackboard
        // back untouched.
        Err(GenerateError::Routing(RouterError::Llm(e))) => {
            tracing::error!(error = %e, "routing failed, turn aborted");
            Ok(blackboard)
        }
        Err(e) => Err(e),
    }
}
