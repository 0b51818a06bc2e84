//! Process content validation
//!
//! BPMN process definitions go through an ordered chain of independent
//! structural checks. Every check runs; their errors are concatenated in
//! chain order.

pub mod call_activity;
pub mod engine;
pub mod flows;
pub mod name;
pub mod service_task;
pub mod unique_id;
pub mod user_task;

use std::fmt;

use tracing::debug;

use super::{ModelValidator, SyntacticError, ValidationConcern, ValidationContext, ValidationError};
use crate::config::ValidationConfig;
use crate::import::{BpmnImporter, ImportError};
use crate::models::BpmnDocument;

pub use call_activity::CallActivityValidator;
pub use engine::EngineRulesValidator;
pub use flows::FlowArityValidator;
pub use name::ProcessNameValidator;
pub use service_task::ServiceTaskImplementationValidator;
pub use unique_id::UniqueIdValidator;
pub use user_task::UserTaskAssigneeValidator;

/// A structural check over a parsed process document
pub trait BpmnModelValidator: Send + Sync + fmt::Debug {
    /// Check name, as used by `enabled_checks`
    fn name(&self) -> &'static str;

    fn validate(
        &self,
        document: &BpmnDocument,
        context: &ValidationContext<'_>,
    ) -> Vec<ValidationError>;
}

/// Content validator for process models
#[derive(Debug)]
pub struct ProcessModelValidator {
    process_type: String,
    validators: Vec<Box<dyn BpmnModelValidator>>,
}

impl ProcessModelValidator {
    pub fn new(process_type: impl Into<String>, validators: Vec<Box<dyn BpmnModelValidator>>) -> Self {
        Self {
            process_type: process_type.into(),
            validators,
        }
    }

    /// Standard chain, restricted to the enabled checks
    pub fn from_config(config: &ValidationConfig) -> Self {
        let chain: Vec<Box<dyn BpmnModelValidator>> = vec![
            Box::new(EngineRulesValidator),
            Box::new(ProcessNameValidator),
            Box::new(UniqueIdValidator),
            Box::new(FlowArityValidator),
            Box::new(CallActivityValidator::new(config.process_type.clone())),
            Box::new(ServiceTaskImplementationValidator::from_config(config)),
            Box::new(UserTaskAssigneeValidator::new(config.require_user_task_assignee)),
        ];
        let validators = chain
            .into_iter()
            .filter(|v| config.is_check_enabled(v.name()))
            .collect();
        Self::new(config.process_type.clone(), validators)
    }

    /// Names of the checks in chain order
    pub fn check_names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Run every check on a parsed document
    pub fn validate_document(
        &self,
        document: &BpmnDocument,
        context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        self.validators
            .iter()
            .flat_map(|validator| validator.validate(document, context))
            .collect()
    }
}

impl ModelValidator for ProcessModelValidator {
    fn handled_model_type(&self) -> Option<&str> {
        Some(&self.process_type)
    }

    fn concern(&self) -> ValidationConcern {
        ValidationConcern::Content
    }

    fn validate(
        &self,
        content: &[u8],
        context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError> {
        let document = BpmnImporter::new().import(content).map_err(|e| {
            debug!(error = %e, "Process content cannot be converted");
            SyntacticError::new(match e {
                ImportError::EmptyContent => "Xml content for the model is not present",
                ImportError::InvalidBpmn(_) => "Xml content for the model is not valid.",
                _ => "Xml content for the model is not parsable.",
            })
        })?;

        let errors = self.validate_document(&document, context);
        debug!(count = errors.len(), "Process content validated");
        Ok(errors)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Wrap process elements in a BPMN definitions document
    pub fn definitions(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn2:definitions xmlns:bpmn2="http://www.omg.org/spec/BPMN/20100524/MODEL"
    xmlns:activiti="http://activiti.org/bpmn" id="model">
{}
</bpmn2:definitions>"#,
            body
        )
    }

    /// A valid process with a single user task
    pub fn simple_process() -> String {
        definitions(
            r#"<bpmn2:process id="process-1" name="simple-process" isExecutable="true">
    <bpmn2:startEvent id="start" />
    <bpmn2:userTask id="task" name="Task" activiti:assignee="${initiator}" />
    <bpmn2:endEvent id="end" />
    <bpmn2:sequenceFlow id="f1" sourceRef="start" targetRef="task" />
    <bpmn2:sequenceFlow id="f2" sourceRef="task" targetRef="end" />
  </bpmn2:process>"#,
        )
    }
}
