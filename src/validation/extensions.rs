//! Extensions validation
//!
//! Every extensions file passes a schema gate first. When other models are
//! available, the file is then converted into an [`ExtensionsModel`] and handed
//! to the semantic check of its model type.

use std::fmt;

use tracing::debug;

use super::schema::{Schema, SchemaValidator};
use super::{ModelValidator, SyntacticError, ValidationConcern, ValidationContext, ValidationError};
use crate::import::ExtensionsImporter;
use crate::models::ExtensionsModel;

/// Semantic step run after the schema gate
pub trait ExtensionsCheck: Send + Sync + fmt::Debug {
    fn validate_extensions(
        &self,
        model: &ExtensionsModel,
        context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError>;
}

/// Check used by the generic validator
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExtensionsCheck;

impl ExtensionsCheck for NoExtensionsCheck {
    fn validate_extensions(
        &self,
        _model: &ExtensionsModel,
        _context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError> {
        Ok(Vec::new())
    }
}

/// Validator for the extensions file of a model type
#[derive(Debug)]
pub struct ExtensionsValidator {
    model_type: Option<String>,
    schema: Schema,
    check: Box<dyn ExtensionsCheck>,
}

impl ExtensionsValidator {
    /// Generic validator applied to model types without their own
    pub fn generic(schema: Schema) -> Self {
        Self {
            model_type: None,
            schema,
            check: Box::new(NoExtensionsCheck),
        }
    }

    /// Validator for one model type with its own schema and semantic check
    pub fn for_model_type(
        model_type: impl Into<String>,
        schema: Schema,
        check: impl ExtensionsCheck + 'static,
    ) -> Self {
        Self {
            model_type: Some(model_type.into()),
            schema,
            check: Box::new(check),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl ModelValidator for ExtensionsValidator {
    fn handled_model_type(&self) -> Option<&str> {
        self.model_type.as_deref()
    }

    fn concern(&self) -> ValidationConcern {
        ValidationConcern::Extensions
    }

    fn validate(
        &self,
        content: &[u8],
        context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError> {
        let mut errors = SchemaValidator::new().validate(Some(content), &self.schema)?;

        if content.is_empty() || context.is_empty() {
            return Ok(errors);
        }

        let model = match ExtensionsImporter::new().import(content) {
            Ok(model) => model,
            // The schema errors already describe what the conversion rejects
            Err(e) if !errors.is_empty() => {
                debug!(error = %e, "Skipping semantic checks on invalid extensions");
                return Ok(errors);
            }
            Err(e) => {
                debug!(error = %e, "Extensions content cannot be converted");
                return Err(SyntacticError::with_cause(
                    "Cannot convert json extensions to a model",
                    e,
                ));
            }
        };
        errors.extend(self.check.validate_extensions(&model, context)?);

        Ok(errors)
    }
}
