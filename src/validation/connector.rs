//! Connector validation
//!
//! Connector content is checked against the connector schema. Content that
//! passes the schema is then checked for duplicate parameter names, since
//! task mappings address action parameters by name.

use std::collections::HashSet;

use tracing::debug;

use super::schema::{Schema, SchemaLoadError, SchemaValidator};
use super::{ModelValidator, SyntacticError, ValidationConcern, ValidationContext, ValidationError};
use crate::import::ConnectorImporter;
use crate::models::{ConnectorAction, ConnectorModelContent, ConnectorParameter, MappingDirection};

/// Content validator for connector models
#[derive(Debug)]
pub struct ConnectorModelValidator {
    model_type: String,
    schema: Schema,
}

impl ConnectorModelValidator {
    pub fn new(model_type: impl Into<String>) -> Result<Self, SchemaLoadError> {
        Ok(Self {
            model_type: model_type.into(),
            schema: Schema::connector()?,
        })
    }
}

impl ModelValidator for ConnectorModelValidator {
    fn handled_model_type(&self) -> Option<&str> {
        Some(&self.model_type)
    }

    fn concern(&self) -> ValidationConcern {
        ValidationConcern::Content
    }

    fn validate(
        &self,
        content: &[u8],
        _context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError> {
        if content.is_empty() {
            return Err(SyntacticError::new("Json content for the connector is not present"));
        }

        let errors = SchemaValidator::new().validate(Some(content), &self.schema)?;
        if !errors.is_empty() {
            return Ok(errors);
        }

        let connector = ConnectorImporter::new()
            .import(content)
            .map_err(|e| SyntacticError::with_cause("Cannot convert json to a connector model", e))?;

        Ok(duplicate_parameters(&connector))
    }
}

fn duplicate_parameters(connector: &ConnectorModelContent) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for action in connector.actions.values() {
        for (direction, parameters) in [
            (MappingDirection::Inputs, &action.inputs),
            (MappingDirection::Outputs, &action.outputs),
        ] {
            let mut seen = HashSet::new();
            for parameter in parameters {
                if !seen.insert(parameter.name.as_str()) {
                    errors.push(duplicate_parameter(connector, action, parameter, direction));
                }
            }
        }
    }
    errors
}

fn duplicate_parameter(
    connector: &ConnectorModelContent,
    action: &ConnectorAction,
    parameter: &ConnectorParameter,
    direction: MappingDirection,
) -> ValidationError {
    ValidationError::new(
        format!("Duplicate connector {} parameter: {}", direction, parameter.name),
        format!(
            "The action '{}' of connector '{}' declares the {} parameter '{}' more than once",
            action.name, connector.name, direction, parameter.name
        ),
    )
}

/// Split a service task implementation into connector and action names
pub fn split_implementation(implementation: &str) -> (&str, Option<&str>) {
    match implementation.split_once('.') {
        Some((connector, action)) => (connector, Some(action)),
        None => (implementation, None),
    }
}

/// Find the connector with the given name among the context models
///
/// Connector models that cannot be parsed are skipped.
pub fn find_connector(
    context: &ValidationContext<'_>,
    connector_type: &str,
    name: &str,
) -> Option<ConnectorModelContent> {
    context.available_models(connector_type).find_map(|model| {
        match ConnectorImporter::new().import(&model.content) {
            Ok(connector) if connector.name == name || model.name.as_deref() == Some(name) => {
                Some(connector)
            }
            Ok(_) => None,
            Err(e) => {
                debug!(model_id = %model.id, error = %e, "Skipping unparsable connector model");
                None
            }
        }
    })
}

#[cfg(test)]
mod connector_tests {
    use super::*;
    use crate::models::Model;

    fn validator() -> ConnectorModelValidator {
        ConnectorModelValidator::new("CONNECTOR").unwrap()
    }

    #[test]
    fn test_valid_connector_passes() {
        let content = br#"{"id":"c1","name":"rest-connector","actions":{"a1":{"name":"POST","inputs":[{"name":"url","type":"string"}]}}}"#;
        assert!(validator().validate(content, &ValidationContext::empty()).unwrap().is_empty());
    }

    #[test]
    fn test_uppercase_name_fails_pattern_only() {
        let errors = validator()
            .validate(br#"{"name":"NameWithUppercase"}"#, &ValidationContext::empty())
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].problem().contains("does not match pattern"));
    }

    #[test]
    fn test_duplicate_parameters_reported_after_schema_passes() {
        let content = br#"{"name":"c","actions":{"a":{"name":"RUN","inputs":[{"name":"x"},{"name":"x"}],"outputs":[{"name":"x"}]}}}"#;
        let errors = validator().validate(content, &ValidationContext::empty()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].problem(), "Duplicate connector input parameter: x");
    }

    #[test]
    fn test_missing_and_malformed_content_are_syntactic() {
        assert!(validator().validate(b"", &ValidationContext::empty()).is_err());
        assert!(validator().validate(b"{", &ValidationContext::empty()).is_err());
    }

    #[test]
    fn test_split_implementation() {
        assert_eq!(split_implementation("rest.POST"), ("rest", Some("POST")));
        assert_eq!(split_implementation("rest"), ("rest", None));
        assert_eq!(split_implementation("a.b.c"), ("a", Some("b.c")));
    }

    #[test]
    fn test_find_connector_by_content_name() {
        let good = Model::new("c1", "CONNECTOR", br#"{"name":"rest"}"#.to_vec());
        let broken = Model::new("c2", "CONNECTOR", b"{".to_vec());
        let context = ValidationContext::new([&broken, &good]);
        assert!(find_connector(&context, "CONNECTOR", "rest").is_some());
        assert!(find_connector(&context, "CONNECTOR", "other").is_none());
    }
}
