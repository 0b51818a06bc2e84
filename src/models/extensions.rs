//! Extensions model definitions
//!
//! An extensions document is a JSON file stored next to a model. For process
//! models it declares process variables, the mappings between task parameters
//! and those variables, and constants:
//!
//! ```json
//! {
//!   "id": "process-a1b2c3",
//!   "name": "my-process",
//!   "extensions": {
//!     "properties": { "v1": { "id": "v1", "name": "amount", "type": "integer" } },
//!     "mappings": { "task1": { "inputs": { "x": { "type": "variable", "value": "amount" } } } },
//!     "constants": {}
//!   }
//! }
//! ```
//!
//! `extensions` is either flat as above or keyed by process definition id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An extensions file as uploaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionsModel {
    /// Extensions model id, e.g. `process-<processId>`
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Raw extensions map, flat or keyed by process id
    #[serde(default)]
    pub extensions: Map<String, Value>,
}

impl ExtensionsModel {
    /// Model id or an empty string
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Raw extensions for one process definition
    ///
    /// Uses the entry keyed by `process_id` when there is one, otherwise the
    /// whole map.
    pub fn raw_extensions_for(&self, process_id: &str) -> Value {
        match self.extensions.get(process_id) {
            Some(Value::Object(nested)) => Value::Object(nested.clone()),
            _ => Value::Object(self.extensions.clone()),
        }
    }

    /// Typed extensions for one process definition
    pub fn extensions_for(&self, process_id: &str) -> Result<Extensions, serde_json::Error> {
        serde_json::from_value(self.raw_extensions_for(process_id))
    }
}

/// Extensions of a single process definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extensions {
    /// Declared process variables, keyed by variable id
    #[serde(rename = "properties", default)]
    pub process_variables: BTreeMap<String, ProcessVariable>,
    /// Task variable mappings, keyed by flow node id
    #[serde(rename = "mappings", default)]
    pub variables_mappings: BTreeMap<String, TaskVariableMapping>,
    /// Constants, keyed by flow node id then constant name
    #[serde(default)]
    pub constants: BTreeMap<String, BTreeMap<String, Constant>>,
}

impl Extensions {
    /// Whether a process variable with this name is declared
    pub fn has_variable_named(&self, name: &str) -> bool {
        self.process_variables.values().any(|v| v.name == name)
    }
}

/// A declared process variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessVariable {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Variable type, e.g. `string`, `integer`, `json`
    #[serde(rename = "type", default)]
    pub variable_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

/// How a mapping value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingType {
    /// `value` is a literal
    Value,
    /// `value` names a process variable
    Variable,
    /// `value` is a literal that is never resolved as an expression
    StaticValue,
}

/// A single input or output mapping of a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessVariableMapping {
    #[serde(rename = "type")]
    pub mapping_type: MappingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ProcessVariableMapping {
    /// Create a mapping to a process variable
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            mapping_type: MappingType::Variable,
            value: Some(Value::String(name.into())),
        }
    }

    /// Create a literal mapping
    pub fn value(value: Value) -> Self {
        Self {
            mapping_type: MappingType::Value,
            value: Some(value),
        }
    }

    /// Whether the mapping refers to a process variable
    pub fn is_variable(&self) -> bool {
        self.mapping_type == MappingType::Variable
    }

    /// Mapping value rendered as text; strings are taken verbatim
    pub fn value_text(&self) -> String {
        match &self.value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Direction of a task mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingDirection {
    Inputs,
    Outputs,
}

impl fmt::Display for MappingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingDirection::Inputs => write!(f, "input"),
            MappingDirection::Outputs => write!(f, "output"),
        }
    }
}

/// Input and output mappings of one task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskVariableMapping {
    /// Keyed by task parameter name
    #[serde(default)]
    pub inputs: BTreeMap<String, ProcessVariableMapping>,
    /// Keyed by process variable name for output mappings
    #[serde(default)]
    pub outputs: BTreeMap<String, ProcessVariableMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_type: Option<String>,
}

impl TaskVariableMapping {
    /// Both mapping directions, inputs first
    pub fn directions(
        &self,
    ) -> [(MappingDirection, &BTreeMap<String, ProcessVariableMapping>); 2] {
        [
            (MappingDirection::Inputs, &self.inputs),
            (MappingDirection::Outputs, &self.outputs),
        ]
    }
}

/// A constant bound to a flow node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    #[serde(default)]
    pub value: Value,
}

#[cfg(test)]
mod extensions_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_extensions_apply_to_any_process() {
        let model: ExtensionsModel = serde_json::from_value(json!({
            "id": "process-p1",
            "extensions": {
                "properties": { "v1": { "id": "v1", "name": "amount", "type": "integer" } },
                "mappings": {}
            }
        }))
        .unwrap();

        let extensions = model.extensions_for("p1").unwrap();
        assert!(extensions.has_variable_named("amount"));
        assert!(!extensions.has_variable_named("v1"));
    }

    #[test]
    fn test_nested_extensions_keyed_by_process_id() {
        let model: ExtensionsModel = serde_json::from_value(json!({
            "id": "process-p1",
            "extensions": {
                "p1": { "properties": { "v1": { "id": "v1", "name": "a", "type": "string" } } },
                "p2": { "properties": { "v2": { "id": "v2", "name": "b", "type": "string" } } }
            }
        }))
        .unwrap();

        assert!(model.extensions_for("p2").unwrap().has_variable_named("b"));
        assert!(!model.extensions_for("p2").unwrap().has_variable_named("a"));
    }

    #[test]
    fn test_mapping_types_use_snake_case_wire_names() {
        let mapping: TaskVariableMapping = serde_json::from_value(json!({
            "inputs": {
                "a": { "type": "variable", "value": "x" },
                "b": { "type": "value", "value": 3 },
                "c": { "type": "static_value", "value": "${raw}" }
            }
        }))
        .unwrap();

        assert!(mapping.inputs["a"].is_variable());
        assert_eq!(mapping.inputs["b"].value_text(), "3");
        assert_eq!(mapping.inputs["c"].mapping_type, MappingType::StaticValue);
        assert!(mapping.outputs.is_empty());
    }
}
