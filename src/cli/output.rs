//! Output formatting for CLI

use serde::Serialize;

use crate::validation::{ModelValidationError, ValidationConcern, ValidationError};

/// Result of validating one file, as printed by the CLI
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub model_type: String,
    pub concern: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntactic_error: Option<String>,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new(
        model_type: &str,
        concern: ValidationConcern,
        outcome: &Result<(), ModelValidationError>,
    ) -> Self {
        let (syntactic_error, errors) = match outcome {
            Ok(()) => (None, Vec::new()),
            Err(ModelValidationError::Syntactic { message }) => (Some(message.clone()), Vec::new()),
            Err(ModelValidationError::Semantic { errors }) => (None, errors.clone()),
        };
        Self {
            model_type: model_type.to_string(),
            concern: concern.to_string(),
            valid: outcome.is_ok(),
            syntactic_error,
            errors,
        }
    }
}

/// Format a report for the terminal
pub fn format_text(report: &ValidationReport) -> String {
    let mut output = String::new();

    if let Some(message) = &report.syntactic_error {
        output.push_str(&format!(
            "❌ {} {} cannot be validated:\n  {}\n",
            report.model_type, report.concern, message
        ));
        return output;
    }

    if report.errors.is_empty() {
        output.push_str("✅ Validation successful\n");
        return output;
    }

    output.push_str(&format!(
        "❌ {} validation error(s) in {} {}:\n",
        report.errors.len(),
        report.model_type,
        report.concern
    ));
    for error in &report.errors {
        let marker = if error.is_warning() { "warning" } else { "error" };
        output.push_str(&format!("  - [{}] {}\n", marker, error.problem()));
        output.push_str(&format!("    {}\n", error.description()));
        if let Some(set) = error.validator_set_name() {
            output.push_str(&format!("    at {}\n", set));
        }
    }

    output
}

/// Format a report as pretty-printed JSON
pub fn format_json(report: &ValidationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod output_tests {
    use super::*;

    #[test]
    fn test_text_lists_errors() {
        let outcome = Err(ModelValidationError::Semantic {
            errors: vec![ValidationError::new("Duplicate element id", "The id 'a' is used twice")],
        });
        let report = ValidationReport::new("PROCESS", ValidationConcern::Content, &outcome);
        let text = format_text(&report);
        assert!(text.contains("1 validation error(s) in PROCESS content"));
        assert!(text.contains("The id 'a' is used twice"));
    }

    #[test]
    fn test_json_carries_syntactic_message() {
        let outcome = Err(ModelValidationError::Syntactic {
            message: "Xml content for the model is not parsable.".to_string(),
        });
        let report = ValidationReport::new("PROCESS", ValidationConcern::Content, &outcome);
        let json: serde_json::Value = serde_json::from_str(&format_json(&report).unwrap()).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["syntacticError"], "Xml content for the model is not parsable.");
    }
}
