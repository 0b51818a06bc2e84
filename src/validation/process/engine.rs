//! Engine rules
//!
//! Structural soundness the process engine needs before it can deploy a
//! definition. All errors carry the `executable-process` validator set name.

use std::collections::HashSet;

use super::BpmnModelValidator;
use crate::models::{BpmnDocument, EventDefinition, FlowNodeKind, Process};
use crate::validation::{ValidationContext, ValidationError};

/// Validator set name of the engine rules
pub const EXECUTABLE_PROCESS_SET: &str = "executable-process";

#[derive(Debug, Default, Clone, Copy)]
pub struct EngineRulesValidator;

impl BpmnModelValidator for EngineRulesValidator {
    fn name(&self) -> &'static str {
        "engine"
    }

    fn validate(
        &self,
        document: &BpmnDocument,
        _context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if document.processes.is_empty() {
            errors.push(engine_error(
                "process-definition-missing",
                "The definitions do not contain any process",
            ));
            return errors;
        }

        if document.processes.iter().all(|p| !p.is_executable) {
            errors.push(engine_error(
                "process-definition-not-executable",
                "All process definition are set to be non-executable (property 'isExecutable' on process). This is not allowed.",
            ));
        }

        for process in &document.processes {
            check_flow_element_ids(process, &mut errors);
            check_sequence_flows(process, &mut errors);
            check_message_refs(document, process, &mut errors);
            check_default_flows(process, &mut errors);
        }

        errors
    }
}

fn engine_error(problem: &str, description: impl Into<String>) -> ValidationError {
    ValidationError::new(problem, description).with_validator_set_name(EXECUTABLE_PROCESS_SET)
}

fn check_flow_element_ids(process: &Process, errors: &mut Vec<ValidationError>) {
    for node in &process.flow_nodes {
        if node.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            errors.push(engine_error(
                "flow-element-id-missing",
                format!(
                    "A {:?} in process '{}' has no id",
                    node.kind,
                    process.id()
                ),
            ));
        }
    }
    for flow in &process.sequence_flows {
        if flow.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            errors.push(engine_error(
                "flow-element-id-missing",
                format!("A sequence flow in process '{}' has no id", process.id()),
            ));
        }
    }
}

fn check_sequence_flows(process: &Process, errors: &mut Vec<ValidationError>) {
    for flow in &process.sequence_flows {
        let source = flow.source_ref.as_deref().unwrap_or_default();
        if process.find_flow_node(source).is_none() {
            errors.push(engine_error(
                "sequence-flow-invalid-src",
                format!(
                    "Invalid source '{}' for sequenceflow '{}' in process '{}'",
                    source,
                    flow.id(),
                    process.id()
                ),
            ));
        }
        let target = flow.target_ref.as_deref().unwrap_or_default();
        if process.find_flow_node(target).is_none() {
            errors.push(engine_error(
                "sequence-flow-invalid-target",
                format!(
                    "Invalid target '{}' for sequenceflow '{}' in process '{}'",
                    target,
                    flow.id(),
                    process.id()
                ),
            ));
        }
    }
}

fn check_message_refs(document: &BpmnDocument, process: &Process, errors: &mut Vec<ValidationError>) {
    for node in &process.flow_nodes {
        for definition in &node.event_definitions {
            let EventDefinition::Message { message_ref } = definition else {
                continue;
            };
            let Some(message_ref) = message_ref.as_deref().filter(|r| !r.is_empty()) else {
                continue;
            };
            if !document.has_message(message_ref) {
                errors.push(engine_error(
                    "message-event-invalid-message-ref",
                    format!(
                        "Invalid 'messageRef' '{}' on event '{}': no message with that id can be found in the model",
                        message_ref,
                        node.label()
                    ),
                ));
            }
        }
    }
}

fn check_default_flows(process: &Process, errors: &mut Vec<ValidationError>) {
    for gateway in process.flow_nodes_of_kind(FlowNodeKind::ExclusiveGateway) {
        let Some(default_flow) = gateway.default_flow.as_deref() else {
            continue;
        };
        let outgoing: HashSet<&str> = process.outgoing_flows(gateway.id()).map(|f| f.id()).collect();
        if !outgoing.contains(default_flow) {
            errors.push(engine_error(
                "exclusive-gateway-default-flow-invalid",
                format!(
                    "Default sequence flow '{}' of exclusive gateway '{}' is not one of its outgoing flows",
                    default_flow,
                    gateway.label()
                ),
            ));
        }
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;
    use crate::import::BpmnImporter;
    use crate::validation::process::test_support::{definitions, simple_process};

    fn run(xml: &str) -> Vec<ValidationError> {
        let document = BpmnImporter::new().import_str(xml).unwrap();
        EngineRulesValidator.validate(&document, &ValidationContext::empty())
    }

    fn problems(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.problem()).collect()
    }

    #[test]
    fn test_valid_process_passes() {
        assert!(run(&simple_process()).is_empty());
    }

    #[test]
    fn test_missing_process() {
        let errors = run(&definitions(r#"<bpmn2:message id="m" />"#));
        assert_eq!(problems(&errors), vec!["process-definition-missing"]);
        assert_eq!(errors[0].validator_set_name(), Some(EXECUTABLE_PROCESS_SET));
    }

    #[test]
    fn test_all_processes_non_executable() {
        let errors = run(&definitions(
            r#"<bpmn2:process id="a" isExecutable="false" /><bpmn2:process id="b" isExecutable="false" />"#,
        ));
        assert_eq!(problems(&errors), vec!["process-definition-not-executable"]);
    }

    #[test]
    fn test_one_executable_process_is_enough() {
        let errors = run(&definitions(
            r#"<bpmn2:process id="a" isExecutable="false" /><bpmn2:process id="b" />"#,
        ));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_dangling_sequence_flow() {
        let errors = run(&definitions(
            r#"<bpmn2:process id="p">
    <bpmn2:startEvent id="start" />
    <bpmn2:sequenceFlow id="f1" sourceRef="start" targetRef="nowhere" />
    <bpmn2:sequenceFlow id="f2" targetRef="start" />
  </bpmn2:process>"#,
        ));
        assert_eq!(
            problems(&errors),
            vec!["sequence-flow-invalid-target", "sequence-flow-invalid-src"]
        );
    }

    #[test]
    fn test_missing_flow_element_id() {
        let errors = run(&definitions(
            r#"<bpmn2:process id="p"><bpmn2:userTask name="no id" /></bpmn2:process>"#,
        ));
        assert_eq!(problems(&errors), vec!["flow-element-id-missing"]);
    }

    #[test]
    fn test_unknown_message_ref() {
        let errors = run(&definitions(
            r#"<bpmn2:message id="known" />
  <bpmn2:process id="p">
    <bpmn2:startEvent id="s1"><bpmn2:messageEventDefinition messageRef="known" /></bpmn2:startEvent>
    <bpmn2:startEvent id="s2"><bpmn2:messageEventDefinition messageRef="unknown" /></bpmn2:startEvent>
  </bpmn2:process>"#,
        ));
        assert_eq!(problems(&errors), vec!["message-event-invalid-message-ref"]);
        assert!(errors[0].description().contains("'unknown'"));
    }

    #[test]
    fn test_default_flow_must_be_outgoing() {
        let errors = run(&definitions(
            r#"<bpmn2:process id="p">
    <bpmn2:startEvent id="s" />
    <bpmn2:exclusiveGateway id="g" default="f1" />
    <bpmn2:exclusiveGateway id="h" default="f2" />
    <bpmn2:endEvent id="e" />
    <bpmn2:sequenceFlow id="f0" sourceRef="s" targetRef="g" />
    <bpmn2:sequenceFlow id="f1" sourceRef="g" targetRef="h" />
    <bpmn2:sequenceFlow id="f2" sourceRef="g" targetRef="e" />
    <bpmn2:sequenceFlow id="f3" sourceRef="h" targetRef="e" />
  </bpmn2:process>"#,
        ));
        assert_eq!(problems(&errors), vec!["exclusive-gateway-default-flow-invalid"]);
        assert!(errors[0].description().contains("'h'"));
    }
}
