// ABOUTME: Function-call contract types: specs describing what an agent may emit,
// ABOUTME: and the calls agents actually produce. Pure data, validated at construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while constructing schema types.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("function name must not be empty")]
    EmptyFunctionName,

    #[error("duplicate parameter name '{0}' in function '{1}'")]
    DuplicateParameter(String, String),
}

/// The primitive type of one function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Int,
    Float,
    Bool,
}

/// Describes one parameter of a function an agent may generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    /// When set, the generated value must be one of these strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, parameter_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            allowed_values: None,
        }
    }

    pub fn with_allowed_values(
        name: impl Into<String>,
        parameter_type: ParameterType,
        allowed_values: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            allowed_values: Some(allowed_values.iter().map(|v| v.to_string()).collect()),
        }
    }
}

/// Describes one function an agent understands or is allowed to generate.
/// Immutable once constructed; calls are matched against it by name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub function_name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl FunctionSpec {
    /// Build a validated spec: non-empty name, no duplicate parameter names.
    pub fn new(
        function_name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
    ) -> Result<Self, SchemaError> {
        let function_name = function_name.into();
        if function_name.trim().is_empty() {
            return Err(SchemaError::EmptyFunctionName);
        }
        let mut seen: Vec<&str> = Vec::with_capacity(parameters.len());
        for p in &parameters {
            if seen.contains(&p.name.as_str()) {
                return Err(SchemaError::DuplicateParameter(
                    p.name.clone(),
                    function_name,
                ));
            }
            seen.push(&p.name);
        }
        Ok(Self {
            function_name,
            description: description.into(),
            parameters,
        })
    }
}

/// A function call emitted by an agent. Arguments are kept as loose JSON
/// values; the core does no deep type-checking against the FunctionSpec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function_name: String,
    #[serde(default)]
    pub arguments: BTreeMap<String, Value>,
}

impl FunctionCall {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }
}
