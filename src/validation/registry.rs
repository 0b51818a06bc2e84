//! Validator registry
//!
//! Maps `(model type, concern)` to the validators to run. Model types are
//! matched case-insensitively.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::ModelValidator;
use super::ValidationConcern;
use super::connector::ConnectorModelValidator;
use super::extensions::ExtensionsValidator;
use super::process::ProcessModelValidator;
use super::process_extensions::process_extensions_validator;
use super::schema::{Schema, SchemaLoadError};
use crate::config::ValidationConfig;
use crate::models::ModelType;

type RegistryKey = (String, ValidationConcern);

/// Validators grouped by model type and concern
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<RegistryKey, Vec<Arc<dyn ModelValidator>>>,
}

impl ValidatorRegistry {
    /// Group validators by the type they handle.
    ///
    /// The generic extensions validator is appended to the extensions
    /// validators of every known model type except the process type, which
    /// has its own.
    pub fn new(
        validators: Vec<Arc<dyn ModelValidator>>,
        generic_extensions: Arc<dyn ModelValidator>,
        model_types: &[ModelType],
        process_type: &str,
    ) -> Self {
        let mut grouped: HashMap<RegistryKey, Vec<Arc<dyn ModelValidator>>> = HashMap::new();
        for validator in validators {
            let Some(model_type) = validator.handled_model_type() else {
                debug!(?validator, "Ignoring validator without model type");
                continue;
            };
            let key = (model_type.to_uppercase(), validator.concern());
            grouped.entry(key).or_default().push(validator);
        }

        for model_type in model_types.iter().filter(|t| !t.is(process_type)) {
            grouped
                .entry((model_type.name.to_uppercase(), ValidationConcern::Extensions))
                .or_default()
                .push(Arc::clone(&generic_extensions));
        }

        Self { validators: grouped }
    }

    /// Standard registry for a configuration
    pub fn from_config(config: &ValidationConfig) -> Result<Self, SchemaLoadError> {
        let validators: Vec<Arc<dyn ModelValidator>> = vec![
            Arc::new(ProcessModelValidator::from_config(config)),
            Arc::new(process_extensions_validator(config)?),
            Arc::new(ConnectorModelValidator::new(config.connector_type.clone())?),
        ];
        let generic = Arc::new(ExtensionsValidator::generic(Schema::model_extensions()?));

        Ok(Self::new(
            validators,
            generic,
            &config.model_types,
            &config.process_type,
        ))
    }

    /// Validators for a model type and concern, in registration order
    pub fn validators_for(
        &self,
        model_type: &str,
        concern: ValidationConcern,
    ) -> &[Arc<dyn ModelValidator>] {
        self.validators
            .get(&(model_type.to_uppercase(), concern))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::from_config(&ValidationConfig::default()).unwrap()
    }

    #[test]
    fn test_process_gets_dedicated_validators() {
        let registry = registry();
        let content = registry.validators_for("PROCESS", ValidationConcern::Content);
        assert_eq!(content.len(), 1);

        let extensions = registry.validators_for("PROCESS", ValidationConcern::Extensions);
        assert_eq!(extensions.len(), 1);
        assert_eq!(extensions[0].handled_model_type(), Some("PROCESS"));
    }

    #[test]
    fn test_generic_extensions_for_other_types() {
        let registry = registry();
        for model_type in ["CONNECTOR", "FORM", "DECISION", "SCRIPT", "TRIGGER", "UI"] {
            let extensions = registry.validators_for(model_type, ValidationConcern::Extensions);
            assert_eq!(extensions.len(), 1, "{model_type}");
            assert_eq!(extensions[0].handled_model_type(), None);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = registry();
        assert_eq!(registry.validators_for("connector", ValidationConcern::Content).len(), 1);
    }

    #[test]
    fn test_unknown_type_has_no_validators() {
        let registry = registry();
        assert!(registry.validators_for("REPORT", ValidationConcern::Content).is_empty());
        assert!(registry.validators_for("FORM", ValidationConcern::Content).is_empty());
    }
}
