//! Pipeline entry points
//!
//! Selects the validators for a model type and concern, runs them all and
//! turns the outcome into a [`ModelValidationError`] at the boundary.

use tracing::debug;

use super::error::distinct;
use super::schema::SchemaLoadError;
use super::{
    ModelValidationError, NameValidator, SyntacticError, ValidationConcern, ValidationContext,
    ValidationError, ValidatorRegistry,
};
use crate::config::ValidationConfig;

/// Validation service for model content and extensions
#[derive(Debug)]
pub struct ModelValidationService {
    config: ValidationConfig,
    registry: ValidatorRegistry,
}

impl ModelValidationService {
    /// Build the service with the standard registry for a configuration
    pub fn new(config: ValidationConfig) -> Result<Self, SchemaLoadError> {
        let registry = ValidatorRegistry::from_config(&config)?;
        Ok(Self::with_registry(config, registry))
    }

    pub fn with_registry(config: ValidationConfig, registry: ValidatorRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate the main content of a model
    pub fn validate_content(
        &self,
        model_type: &str,
        content: &[u8],
        context: &ValidationContext<'_>,
    ) -> Result<(), ModelValidationError> {
        self.check(model_type, ValidationConcern::Content, content, context)
    }

    /// Validate the extensions file of a model
    pub fn validate_extensions(
        &self,
        model_type: &str,
        content: &[u8],
        context: &ValidationContext<'_>,
    ) -> Result<(), ModelValidationError> {
        self.check(model_type, ValidationConcern::Extensions, content, context)
    }

    /// Run every validator registered for the type and concern
    ///
    /// Errors are concatenated in registration order with duplicates removed.
    /// The first syntactic failure aborts the run.
    pub fn validate(
        &self,
        model_type: &str,
        concern: ValidationConcern,
        content: &[u8],
        context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError> {
        let validators = self.registry.validators_for(model_type, concern);
        debug!(
            model_type,
            %concern,
            validators = validators.len(),
            context_models = context.len(),
            "Validating model"
        );

        let mut errors = Vec::new();
        for validator in validators {
            errors.extend(validator.validate(content, context)?);
        }

        Ok(distinct(errors))
    }

    /// Check a model name against the naming rules
    ///
    /// Uses the DNS label rules with the configured maximum length.
    pub fn validate_model_name(&self, model_type: &str, name: Option<&str>) -> Vec<ValidationError> {
        NameValidator::new()
            .with_max_length(self.config.name_max_length)
            .validate(name, &model_type.to_lowercase())
    }

    fn check(
        &self,
        model_type: &str,
        concern: ValidationConcern,
        content: &[u8],
        context: &ValidationContext<'_>,
    ) -> Result<(), ModelValidationError> {
        match self.validate(model_type, concern, content, context) {
            Ok(errors) if errors.is_empty() => Ok(()),
            Ok(errors) => {
                debug!(model_type, %concern, count = errors.len(), "Semantic validation errors");
                Err(ModelValidationError::Semantic { errors })
            }
            Err(e) => {
                debug!(model_type, %concern, error = %e, "Syntactic validation error");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod service_tests {
    use super::*;
    use crate::models::Model;
    use crate::validation::process::test_support::simple_process;

    fn service() -> ModelValidationService {
        ModelValidationService::new(ValidationConfig::default()).unwrap()
    }

    #[test]
    fn test_valid_process_content() {
        assert!(
            service()
                .validate_content("PROCESS", simple_process().as_bytes(), &ValidationContext::empty())
                .is_ok()
        );
    }

    #[test]
    fn test_unparsable_content_is_syntactic() {
        let err = service()
            .validate_content("PROCESS", b"<definitions", &ValidationContext::empty())
            .unwrap_err();
        assert!(err.is_syntactic());
        assert!(err.errors().is_empty());
    }

    #[test]
    fn test_semantic_errors_are_listed() {
        let err = service()
            .validate_content("CONNECTOR", br#"{"name":"Bad Name"}"#, &ValidationContext::empty())
            .unwrap_err();
        assert!(!err.is_syntactic());
        assert_eq!(err.errors().len(), 1);
    }

    #[test]
    fn test_type_without_validators_passes() {
        assert!(
            service()
                .validate_content("FORM", b"anything", &ValidationContext::empty())
                .is_ok()
        );
    }

    #[test]
    fn test_generic_extensions_require_object() {
        let err = service()
            .validate_extensions("FORM", br#"{"id":"form-1","extensions":[]}"#, &ValidationContext::empty())
            .unwrap_err();
        assert_eq!(err.errors().len(), 1);
    }

    #[test]
    fn test_generic_extensions_with_context() {
        let form = Model::new("form-1", "FORM", b"{}".to_vec());
        let context = ValidationContext::new([&form]);
        assert!(
            service()
                .validate_extensions("FORM", br#"{"id":"form-1","extensions":{"a":1}}"#, &context)
                .is_ok()
        );
    }

    #[test]
    fn test_model_name_rules() {
        let service = service();
        assert!(service.validate_model_name("CONNECTOR", Some("rest-connector")).is_empty());

        let errors = service.validate_model_name("CONNECTOR", None);
        assert_eq!(errors[0].description(), "The connector name is required");
    }
}
