//! Process name check

use super::BpmnModelValidator;
use crate::models::BpmnDocument;
use crate::validation::{NameValidator, ValidationContext, ValidationError};

/// The main process must have a non-empty name
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessNameValidator;

impl BpmnModelValidator for ProcessNameValidator {
    fn name(&self) -> &'static str {
        "name"
    }

    fn validate(
        &self,
        document: &BpmnDocument,
        _context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        match document.main_process() {
            Some(process) => NameValidator::presence_only().validate(process.name.as_deref(), "process"),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod process_name_tests {
    use super::*;
    use crate::import::BpmnImporter;
    use crate::validation::process::test_support::definitions;

    fn run(process: &str) -> Vec<ValidationError> {
        let document = BpmnImporter::new().import_str(&definitions(process)).unwrap();
        ProcessNameValidator.validate(&document, &ValidationContext::empty())
    }

    #[test]
    fn test_named_process_passes() {
        assert!(run(r#"<bpmn2:process id="p" name="Order Handling" />"#).is_empty());
    }

    #[test]
    fn test_missing_name_is_required() {
        let errors = run(r#"<bpmn2:process id="p" />"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].description(), "The process name is required");
    }

    #[test]
    fn test_blank_name_is_empty() {
        let errors = run(r#"<bpmn2:process id="p" name="  " />"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].problem(), "field.empty");
    }
}
