// ABOUTME: Core library for conclave, containing the shared data model used by all components.
// ABOUTME: Defines function-call schemas, chat messages, blackboards, and the GraphQL mutation filter.

pub mod blackboard;
pub mod function;
pub mod graphql;
pub mod message;
pub mod persist;

pub use blackboard::{Blackboard, BlackboardError, FunctionCallBlackboard, GraphQlBlackboard};
pub use function::{FunctionCall, FunctionSpec, ParameterSpec, ParameterType, SchemaError};
pub use message::{Message, MessageRole};
