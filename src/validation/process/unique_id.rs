//! Element id uniqueness

use std::collections::HashMap;

use super::BpmnModelValidator;
use crate::models::BpmnDocument;
use crate::validation::{ValidationContext, ValidationError};

/// Every element id must be unique across the whole document
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueIdValidator;

impl BpmnModelValidator for UniqueIdValidator {
    fn name(&self) -> &'static str {
        "unique-id"
    }

    fn validate(
        &self,
        document: &BpmnDocument,
        _context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for id in &document.element_ids {
            let count = counts.entry(id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(id.as_str());
            }
        }

        order
            .into_iter()
            .map(|id| {
                ValidationError::new(
                    "Duplicate element id",
                    format!(
                        "The id '{}' is used by {} elements of the process definition",
                        id, counts[id]
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod unique_id_tests {
    use super::*;
    use crate::import::BpmnImporter;
    use crate::validation::process::test_support::{definitions, simple_process};

    #[test]
    fn test_unique_ids_pass() {
        let document = BpmnImporter::new().import_str(&simple_process()).unwrap();
        assert!(UniqueIdValidator.validate(&document, &ValidationContext::empty()).is_empty());
    }

    #[test]
    fn test_duplicates_across_processes_and_messages() {
        let xml = definitions(
            r#"<bpmn2:message id="shared" />
  <bpmn2:process id="p1"><bpmn2:startEvent id="shared" /><bpmn2:endEvent id="e" /></bpmn2:process>
  <bpmn2:process id="p2"><bpmn2:endEvent id="e" /><bpmn2:userTask id="shared" /></bpmn2:process>"#,
        );
        let document = BpmnImporter::new().import_str(&xml).unwrap();
        let errors = UniqueIdValidator.validate(&document, &ValidationContext::empty());

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].description(),
            "The id 'shared' is used by 3 elements of the process definition"
        );
        assert_eq!(
            errors[1].description(),
            "The id 'e' is used by 2 elements of the process definition"
        );
    }
}
