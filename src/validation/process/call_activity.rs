//! Call activity targets

use std::collections::HashSet;

use tracing::debug;

use super::BpmnModelValidator;
use crate::import::BpmnImporter;
use crate::models::{BpmnDocument, FlowNodeKind};
use crate::validation::{ValidationContext, ValidationError};

/// A call activity must call a process defined in the same document or in
/// one of the process models of the context
#[derive(Debug, Clone)]
pub struct CallActivityValidator {
    process_type: String,
}

impl CallActivityValidator {
    pub fn new(process_type: impl Into<String>) -> Self {
        Self {
            process_type: process_type.into(),
        }
    }

    /// Process ids a call activity may target
    fn available_process_ids(
        &self,
        document: &BpmnDocument,
        context: &ValidationContext<'_>,
    ) -> HashSet<String> {
        let mut ids: HashSet<String> = document
            .processes
            .iter()
            .filter_map(|p| p.id.clone())
            .collect();

        for model in context.available_models(&self.process_type) {
            ids.insert(model.id.clone());
            match BpmnImporter::new().import(&model.content) {
                Ok(sibling) => ids.extend(sibling.processes.into_iter().filter_map(|p| p.id)),
                Err(e) => debug!(model_id = %model.id, error = %e, "Skipping unparsable process model"),
            }
        }

        ids
    }
}

impl BpmnModelValidator for CallActivityValidator {
    fn name(&self) -> &'static str {
        "call-activity"
    }

    fn validate(
        &self,
        document: &BpmnDocument,
        context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let call_activities: Vec<_> = document
            .processes
            .iter()
            .flat_map(|p| p.flow_nodes_of_kind(FlowNodeKind::CallActivity).map(move |n| (p, n)))
            .collect();
        if call_activities.is_empty() {
            return Vec::new();
        }

        let available = self.available_process_ids(document, context);
        let mut errors = Vec::new();

        for (process, node) in call_activities {
            let called_element = node.called_element.as_deref().map(str::trim).unwrap_or_default();
            if called_element.is_empty() {
                errors.push(ValidationError::new(
                    "No call element found for call activity",
                    format!(
                        "No call element found for call activity '{}' in process '{}'",
                        node.label(),
                        process.id()
                    ),
                ));
            } else if is_expression(called_element) {
                continue;
            } else if !available.contains(called_element) {
                errors.push(ValidationError::new(
                    "Call activity element must be a process id present in the project",
                    format!(
                        "Call activity '{}' with call element '{}' found in process '{}' references a process id that does not exist in the current project.",
                        node.label(),
                        called_element,
                        process.id()
                    ),
                ));
            }
        }

        errors
    }
}

/// Called elements resolved at runtime cannot be checked
fn is_expression(value: &str) -> bool {
    value.starts_with("${") || value.starts_with("#{")
}
