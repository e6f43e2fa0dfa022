// ABOUTME: Shared accumulation state for one conversation: everything agents have
// ABOUTME: produced so far, with "new this round" tracked as a cursor into the store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::function::FunctionCall;
use crate::graphql;
use crate::message::Message;

/// Raised when a caller pairs a blackboard with the wrong agent variant.
/// This is a programming-contract violation, not a runtime condition.
#[derive(Debug, Error)]
pub enum BlackboardError {
    #[error("expected a function-call blackboard but got a GraphQL blackboard")]
    ExpectedFunctionCall,

    #[error("expected a GraphQL blackboard but got a function-call blackboard")]
    ExpectedGraphQl,
}

/// Accumulation state for function-call agents.
///
/// "All" vs "new this round" is one authoritative ordered store plus a cursor
/// marking where the current round began, so the two views cannot diverge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallBlackboard {
    calls: Vec<FunctionCall>,
    messages: Vec<Message>,
    #[serde(default)]
    new_calls_start: usize,
    #[serde(default)]
    new_messages_start: usize,
}

impl FunctionCallBlackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append calls an agent generated this round.
    pub fn add_generated_functions(&mut self, calls: Vec<FunctionCall>) {
        self.calls.extend(calls);
    }

    /// All calls accumulated so far, oldest first.
    pub fn all_function_calls(&self) -> &[FunctionCall] {
        &self.calls
    }

    /// Calls generated since the last reset. The client executes these to
    /// bring its own data up to date.
    pub fn new_function_calls(&self) -> &[FunctionCall] {
        &self.calls[self.new_calls_start.min(self.calls.len())..]
    }

    /// The subset of accumulated calls whose name is in `function_names`,
    /// preserving original order.
    pub fn get_functions_matching(&self, function_names: &[String]) -> Vec<FunctionCall> {
        self.calls
            .iter()
            .filter(|c| function_names.iter().any(|n| *n == c.function_name))
            .cloned()
            .collect()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn all_messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn new_messages(&self) -> &[Message] {
        &self.messages[self.new_messages_start.min(self.messages.len())..]
    }

    /// Receive the client's authoritative current state: clears the "new"
    /// tracking and replaces the accumulated calls wholesale.
    pub fn set_user_data(&mut self, calls: Vec<FunctionCall>) {
        self.calls = calls;
        self.new_calls_start = self.calls.len();
        self.new_messages_start = self.messages.len();
    }

    /// Move the round cursors forward so nothing counts as new. Idempotent.
    pub fn reset_newly_generated(&mut self) {
        self.new_calls_start = self.calls.len();
        self.new_messages_start = self.messages.len();
    }

    /// Discard everything, starting the conversation over.
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}

/// Accumulation state for GraphQL agents.
///
/// Mutations are cleared whenever fresh client data arrives, so the store is
/// effectively "generated since the client last synced". Only messages carry
/// separate new/old tracking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlBlackboard {
    mutation_calls: Vec<String>,
    messages: Vec<Message>,
    #[serde(default)]
    new_messages_start: usize,
    /// Opaque snapshot of the client's data at the start of this generation.
    #[serde(default)]
    user_data: String,
}

impl GraphQlBlackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_generated_mutations(&mut self, mutation_calls: Vec<String>) {
        self.mutation_calls.extend(mutation_calls);
    }

    pub fn all_mutation_calls(&self) -> &[String] {
        &self.mutation_calls
    }

    /// Filter the accumulated mutations down to the operations declared in
    /// the given schemas, for feeding one agent its accepted slice.
    pub fn get_mutations_matching(&self, accepted_schemas: &[String]) -> Vec<String> {
        let accepted_names = graphql::parse_mutation_names(accepted_schemas);
        graphql::filter_mutation_calls(&self.mutation_calls, &accepted_names)
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn all_messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn new_messages(&self) -> &[Message] {
        &self.messages[self.new_messages_start.min(self.messages.len())..]
    }

    pub fn user_data(&self) -> &str {
        &self.user_data
    }

    /// Receive a fresh snapshot of the client's data: accumulated mutations
    /// are cleared and will re-accumulate in the next generation.
    pub fn set_user_data(&mut self, user_data: impl Into<String>) {
        self.mutation_calls.clear();
        self.new_messages_start = self.messages.len();
        self.user_data = user_data.into();
    }

    /// Clear generated mutations and mark all messages as seen. Idempotent
    /// only with respect to messages; mutations are always dropped, matching
    /// the contract that the client has consumed them.
    pub fn reset_newly_generated(&mut self) {
        self.mutation_calls.clear();
        self.new_messages_start = self.messages.len();
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}

/// The two blackboard variants, tagged for persistence. One instance per
/// conversation, owned by the caller and mutated by the execution loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Blackboard {
    FunctionCall(FunctionCallBlackboard),
    GraphQl(GraphQlBlackboard),
}

impl Blackboard {
    pub fn new_function_call() -> Self {
        Self::FunctionCall(FunctionCallBlackboard::new())
    }

    pub fn new_graphql() -> Self {
        Self::GraphQl(GraphQlBlackboard::new())
    }

    pub fn as_function_call(&self) -> Result<&FunctionCallBlackboard, BlackboardError> {
        match self {
            Self::FunctionCall(b) => Ok(b),
            Self::GraphQl(_) => Err(BlackboardError::ExpectedFunctionCall),
        }
    }

    pub fn as_function_call_mut(&mut self) -> Result<&mut FunctionCallBlackboard, BlackboardError> {
        match self {
            Self::FunctionCall(b) => Ok(b),
            Self::GraphQl(_) => Err(BlackboardError::ExpectedFunctionCall),
        }
    }

    pub fn as_graphql(&self) -> Result<&GraphQlBlackboard, BlackboardError> {
        match self {
            Self::GraphQl(b) => Ok(b),
            Self::FunctionCall(_) => Err(BlackboardError::ExpectedGraphQl),
        }
    }

    pub fn as_graphql_mut(&mut self) -> Result<&mut GraphQlBlackboard, BlackboardError> {
        match self {
            Self::GraphQl(b) => Ok(b),
            Self::FunctionCall(_) => Err(BlackboardError::ExpectedGraphQl),
        }
    }

    pub fn add_message(&mut self, message: Message) {
        match self {
            Self::FunctionCall(b) => b.add_message(message),
            Self::GraphQl(b) => b.add_message(message),
        }
    }

    pub fn all_messages(&self) -> &[Message] {
        match self {
            Self::FunctionCall(b) => b.all_messages(),
            Self::GraphQl(b) => b.all_messages(),
        }
    }

    pub fn new_messages(&self) -> &[Message] {
        match self {
            Self::FunctionCall(b) => b.new_messages(),
            Self::GraphQl(b) => b.new_messages(),
        }
    }

    pub fn reset_newly_generated(&mut self) {
        match self {
            Self::FunctionCall(b) => b.reset_newly_generated(),
            Self::GraphQl(b) => b.reset_newly_generated(),
        }
    }

    pub fn reset_all(&mut self) {
        match self {
            Self::FunctionCall(b) => b.reset_all(),
            Self::GraphQl(b) => b.reset_all(),
        }
    }
}
