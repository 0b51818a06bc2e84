//! Task references in process extensions

use super::ProcessExtensionsChecker;
use crate::config::ValidationConfig;
use crate::models::{BpmnDocument, Extensions, FlowNodeKind, Process, TaskVariableMapping};
use crate::validation::connector::{find_connector, split_implementation};
use crate::validation::{ValidationContext, ValidationError};

/// Checks that mappings and constants are keyed by flow nodes of the process,
/// and that connector tasks only map declared action parameters
#[derive(Debug, Clone)]
pub struct TaskMappingsChecker {
    config: ValidationConfig,
}

impl TaskMappingsChecker {
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn check_connector_parameters(
        &self,
        task_id: &str,
        implementation: &str,
        mapping: &TaskVariableMapping,
        context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let (connector_name, Some(action_name)) = split_implementation(implementation) else {
            return Vec::new();
        };
        // Unresolvable implementations are reported by the process content checks
        let Some(connector) = find_connector(context, &self.config.connector_type, connector_name) else {
            return Vec::new();
        };
        let Some(action) = connector.find_action(action_name) else {
            return Vec::new();
        };

        let mut errors = Vec::new();
        for name in mapping.inputs.keys() {
            if !action.has_input(name) {
                errors.push(unknown_connector_parameter(
                    "input",
                    task_id,
                    implementation,
                    name,
                ));
            }
        }
        for entry in mapping.outputs.values().filter(|entry| entry.is_variable()) {
            let name = entry.value_text();
            if !action.has_output(&name) {
                errors.push(unknown_connector_parameter(
                    "output",
                    task_id,
                    implementation,
                    &name,
                ));
            }
        }
        errors
    }
}

impl ProcessExtensionsChecker for TaskMappingsChecker {
    fn check(
        &self,
        extensions: &Extensions,
        process: &Process,
        _document: &BpmnDocument,
        context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let referenced_tasks = extensions
            .variables_mappings
            .keys()
            .chain(extensions.constants.keys());
        for task_id in referenced_tasks {
            if process.find_flow_node(task_id).is_none() {
                errors.push(unknown_task(process.id(), task_id));
            }
        }

        for (task_id, mapping) in &extensions.variables_mappings {
            let Some(node) = process.find_flow_node(task_id) else {
                continue;
            };
            if node.kind != FlowNodeKind::ServiceTask {
                continue;
            }
            let Some(implementation) = node.implementation.as_deref() else {
                continue;
            };
            if self.config.is_builtin_implementation(implementation) {
                continue;
            }
            errors.extend(self.check_connector_parameters(task_id, implementation, mapping, context));
        }

        errors
    }
}

fn unknown_task(process_id: &str, task_id: &str) -> ValidationError {
    ValidationError::new(
        format!("Unknown task in process extensions: {}", task_id),
        format!(
            "The extensions for process '{}' contains mappings for an unknown task '{}'",
            process_id, task_id
        ),
    )
}

fn unknown_connector_parameter(
    direction: &str,
    task_id: &str,
    implementation: &str,
    name: &str,
) -> ValidationError {
    ValidationError::new(
        format!(
            "Mapping {} unknown in connector '{}': {}",
            direction, implementation, name
        ),
        format!(
            "The task '{}' maps the {} '{}' which is not declared by connector action '{}'",
            task_id, direction, name, implementation
        ),
    )
}
