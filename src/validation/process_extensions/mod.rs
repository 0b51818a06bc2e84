//! Process extensions validation
//!
//! Process extensions reference the process definition they belong to: the
//! extensions model `process-<processId>` is bound to the process model with
//! id `<processId>`. The sibling process is looked up in the validation
//! context, parsed, and every process definition it declares is checked
//! against its share of the extensions.

pub mod message_mappings;
pub mod task_mappings;
pub mod variables;

use std::fmt;

use tracing::debug;

use super::extensions::{ExtensionsCheck, ExtensionsValidator};
use super::schema::{Schema, SchemaLoadError};
use super::{SyntacticError, ValidationContext, ValidationError};
use crate::config::ValidationConfig;
use crate::import::BpmnImporter;
use crate::models::model::id_prefix;
use crate::models::{BpmnDocument, Extensions, ExtensionsModel, Process};

pub use message_mappings::MessageMappingsChecker;
pub use task_mappings::TaskMappingsChecker;
pub use variables::ProcessVariablesChecker;

/// A cross-reference check between one process and its extensions
pub trait ProcessExtensionsChecker: Send + Sync + fmt::Debug {
    fn check(
        &self,
        extensions: &Extensions,
        process: &Process,
        document: &BpmnDocument,
        context: &ValidationContext<'_>,
    ) -> Vec<ValidationError>;
}

/// Semantic check of process extensions
#[derive(Debug)]
pub struct ProcessExtensionsCheck {
    process_type: String,
    checkers: Vec<Box<dyn ProcessExtensionsChecker>>,
}

impl ProcessExtensionsCheck {
    pub fn new(
        process_type: impl Into<String>,
        checkers: Vec<Box<dyn ProcessExtensionsChecker>>,
    ) -> Self {
        Self {
            process_type: process_type.into(),
            checkers,
        }
    }

    /// Check with the standard checkers
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(
            config.process_type.clone(),
            vec![
                Box::new(ProcessVariablesChecker),
                Box::new(TaskMappingsChecker::from_config(config)),
                Box::new(MessageMappingsChecker),
            ],
        )
    }

    /// Process id the extensions model is bound to
    pub fn process_id<'m>(&self, model: &'m ExtensionsModel) -> &'m str {
        let model_id = model.id();
        model_id
            .strip_prefix(id_prefix(&self.process_type).as_str())
            .unwrap_or(model_id)
    }
}

impl ExtensionsCheck for ProcessExtensionsCheck {
    fn validate_extensions(
        &self,
        model: &ExtensionsModel,
        context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError> {
        let process_id = self.process_id(model);

        let Some(process_model) = context
            .find_model(&self.process_type, process_id)
            .filter(|m| m.has_content())
        else {
            debug!(process_id, "No process model found for extensions");
            return Ok(vec![unknown_process_id(model.id())]);
        };

        let document = BpmnImporter::new()
            .import(&process_model.content)
            .map_err(|e| SyntacticError::with_cause("Cannot convert to BPMN model", e))?;

        let mut errors = Vec::new();
        for process in &document.processes {
            let extensions = match model.extensions_for(process.id()) {
                Ok(extensions) => extensions,
                Err(e) => {
                    debug!(process_id = process.id(), error = %e, "Skipping unconvertible extensions");
                    continue;
                }
            };
            for checker in &self.checkers {
                errors.extend(checker.check(&extensions, process, &document, context));
            }
        }

        Ok(errors)
    }
}

fn unknown_process_id(extensions_id: &str) -> ValidationError {
    ValidationError::new(
        format!("Unknown process id in process extensions: {}", extensions_id),
        format!(
            "The process extensions are bound to an unknown process id '{}'",
            extensions_id
        ),
    )
}

/// Extensions validator for process models
pub fn process_extensions_validator(
    config: &ValidationConfig,
) -> Result<ExtensionsValidator, SchemaLoadError> {
    Ok(ExtensionsValidator::for_model_type(
        config.process_type.clone(),
        Schema::process_extensions()?,
        ProcessExtensionsCheck::from_config(config),
    ))
}
