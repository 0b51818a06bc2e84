//! Service task implementations

use super::BpmnModelValidator;
use crate::config::ValidationConfig;
use crate::models::{BpmnDocument, FlowNode, FlowNodeKind, Process};
use crate::validation::connector::{find_connector, split_implementation};
use crate::validation::{ValidationContext, ValidationError};

/// A service task implementation `connector.action` must resolve to a
/// connector model of the context and one of its actions
#[derive(Debug, Clone)]
pub struct ServiceTaskImplementationValidator {
    config: ValidationConfig,
}

impl ServiceTaskImplementationValidator {
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn check_task(
        &self,
        process: &Process,
        task: &FlowNode,
        context: &ValidationContext<'_>,
    ) -> Option<ValidationError> {
        let implementation = task.implementation.as_deref().map(str::trim).unwrap_or_default();
        if implementation.is_empty() {
            return Some(ValidationError::new(
                "Invalid service implementation",
                format!(
                    "Service task '{}' in process '{}' has no implementation",
                    task.label(),
                    process.id()
                ),
            ));
        }
        if self.config.is_builtin_implementation(implementation) {
            return None;
        }

        let (connector_name, action_name) = split_implementation(implementation);
        let Some(connector) = find_connector(context, &self.config.connector_type, connector_name) else {
            return Some(ValidationError::new(
                "Invalid service implementation",
                format!(
                    "Invalid service implementation on service '{}': no connector named '{}' found",
                    task.label(),
                    connector_name
                ),
            ));
        };

        let Some(action) = action_name else {
            return Some(ValidationError::new(
                "Invalid service implementation",
                format!(
                    "Invalid service implementation on service '{}': no action given for connector '{}'",
                    task.label(),
                    connector_name
                ),
            ));
        };
        if connector.find_action(action).is_some() {
            return None;
        }

        Some(ValidationError::new(
            "Unknown connector action",
            format!(
                "Service task '{}' references the action '{}' which is not declared by connector '{}'",
                task.label(),
                action,
                connector_name
            ),
        ))
    }
}

impl BpmnModelValidator for ServiceTaskImplementationValidator {
    fn name(&self) -> &'static str {
        "service-task"
    }

    fn validate(
        &self,
        document: &BpmnDocument,
        context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        document
            .processes
            .iter()
            .flat_map(|process| {
                process
                    .flow_nodes_of_kind(FlowNodeKind::ServiceTask)
                    .filter_map(move |task| self.check_task(process, task, context))
            })
            .collect()
    }
}
