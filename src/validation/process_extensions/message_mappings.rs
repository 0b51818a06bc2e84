//! Message payload mappings

use super::ProcessExtensionsChecker;
use crate::models::{BpmnDocument, Extensions, FlowNode, MappingDirection, Process};
use crate::validation::{ValidationContext, ValidationError};

/// Checks the direction of mappings on message events
///
/// A catching message event only receives a payload, so it can map outputs
/// but no inputs; a throwing one only sends, so it can map inputs but no
/// outputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageMappingsChecker;

impl ProcessExtensionsChecker for MessageMappingsChecker {
    fn check(
        &self,
        extensions: &Extensions,
        process: &Process,
        _document: &BpmnDocument,
        _context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (task_id, mapping) in &extensions.variables_mappings {
            let Some(node) = process.find_flow_node(task_id) else {
                continue;
            };
            if !node.has_message_event_definition() {
                continue;
            }
            if node.kind.is_catching_event() && !mapping.inputs.is_empty() {
                errors.push(wrong_direction(process, node, MappingDirection::Inputs));
            }
            if node.kind.is_throwing_event() && !mapping.outputs.is_empty() {
                errors.push(wrong_direction(process, node, MappingDirection::Outputs));
            }
        }

        errors
    }
}

fn wrong_direction(process: &Process, node: &FlowNode, direction: MappingDirection) -> ValidationError {
    let event_role = match direction {
        MappingDirection::Inputs => "catching",
        MappingDirection::Outputs => "throwing",
    };
    ValidationError::new(
        format!("Invalid {} mapping on message event: {}", direction, node.id()),
        format!(
            "The {} message event '{}' in process '{}' cannot declare {} mappings",
            event_role,
            node.label(),
            process.id(),
            direction
        ),
    )
}

#[cfg(test)]
mod message_mappings_tests {
    use super::*;
    use crate::import::BpmnImporter;
    use crate::validation::process_extensions::test_support::PROCESS_XML;
    use serde_json::json;

    fn run(mappings: serde_json::Value) -> Vec<ValidationError> {
        let document = BpmnImporter::new().import_str(PROCESS_XML).unwrap();
        let extensions: Extensions = serde_json::from_value(json!({ "mappings": mappings })).unwrap();
        MessageMappingsChecker.check(
            &extensions,
            &document.processes[0],
            &document,
            &ValidationContext::empty(),
        )
    }

    #[test]
    fn test_catching_event_with_outputs_is_valid() {
        let errors = run(json!({
            "start": { "outputs": { "amount": { "type": "variable", "value": "amount" } } }
        }));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_catching_event_with_inputs_is_reported() {
        let errors = run(json!({
            "start": { "inputs": { "amount": { "type": "variable", "value": "amount" } } }
        }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].problem(), "Invalid input mapping on message event: start");
    }

    #[test]
    fn test_throwing_event_with_outputs_is_reported() {
        let errors = run(json!({
            "notify": {
                "inputs": { "amount": { "type": "variable", "value": "amount" } },
                "outputs": { "reply": { "type": "variable", "value": "reply" } }
            }
        }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].problem(), "Invalid output mapping on message event: notify");
    }

    #[test]
    fn test_non_message_nodes_are_ignored() {
        let errors = run(json!({
            "review": {
                "inputs": { "a": { "type": "value", "value": 1 } },
                "outputs": { "b": { "type": "variable", "value": "b" } }
            }
        }));
        assert!(errors.is_empty());
    }
}
