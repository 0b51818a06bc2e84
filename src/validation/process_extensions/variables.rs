//! Process variable references in task mappings

use super::ProcessExtensionsChecker;
use crate::models::{BpmnDocument, Extensions, MappingDirection, Process};
use crate::validation::{ValidationContext, ValidationError};

/// Checks that variable mappings refer to declared process variables
///
/// Input mappings name the variable in their `value`; output mappings name it
/// in their key. Literal mappings are never checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessVariablesChecker;

impl ProcessExtensionsChecker for ProcessVariablesChecker {
    fn check(
        &self,
        extensions: &Extensions,
        process: &Process,
        _document: &BpmnDocument,
        _context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for mapping in extensions.variables_mappings.values() {
            for (direction, entries) in mapping.directions() {
                for (key, entry) in entries {
                    if !entry.is_variable() {
                        continue;
                    }
                    let variable_name = match direction {
                        MappingDirection::Inputs => entry.value_text(),
                        MappingDirection::Outputs => key.clone(),
                    };
                    if !extensions.has_variable_named(&variable_name) {
                        errors.push(unknown_variable(process.id(), &variable_name));
                    }
                }
            }
        }

        errors
    }
}

fn unknown_variable(process_id: &str, variable_name: &str) -> ValidationError {
    ValidationError::new(
        format!(
            "Unknown process variable in process extensions: {}",
            variable_name
        ),
        format!(
            "The extensions for process '{}' contains mappings for an unknown process variable '{}'",
            process_id, variable_name
        ),
    )
}
