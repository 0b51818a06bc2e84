//! Error types for model validation
//!
//! Two tiers: a [`SyntacticError`] aborts validation of the content, while
//! [`ValidationError`] values are collected and reported together.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single semantic validation failure
///
/// Immutable once created; two errors with the same fields are the same error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    problem: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validator_set_name: Option<String>,
    #[serde(default)]
    warning: bool,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(problem: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            description: description.into(),
            validator_set_name: None,
            warning: false,
        }
    }

    /// Name the validator set or schema location that produced the error
    pub fn with_validator_set_name(mut self, name: impl Into<String>) -> Self {
        self.validator_set_name = Some(name.into());
        self
    }

    /// Mark the error as a warning
    pub fn as_warning(mut self) -> Self {
        self.warning = true;
        self
    }

    /// Short problem code or message
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Human readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn validator_set_name(&self) -> Option<&str> {
        self.validator_set_name.as_deref()
    }

    pub fn is_warning(&self) -> bool {
        self.warning
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.description)?;
        if let Some(name) = &self.validator_set_name {
            write!(f, " [{}]", name)?;
        }
        Ok(())
    }
}

/// Content could not be parsed; validation cannot proceed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntacticError {
    message: String,
}

impl SyntacticError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Create an error whose message carries its cause
    pub fn with_cause(message: impl fmt::Display, cause: impl fmt::Display) -> Self {
        Self::new(format!("{}: {}", message, cause))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a failed validation, as returned to callers of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelValidationError {
    /// The content could not be parsed
    #[error("Syntactic model validation error: {message}")]
    Syntactic { message: String },

    /// The content parsed but broke one or more rules
    #[error("Semantic model validation errors encountered: {} error(s)", .errors.len())]
    Semantic { errors: Vec<ValidationError> },
}

impl ModelValidationError {
    /// Collected semantic errors, empty for syntactic failures
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ModelValidationError::Syntactic { .. } => &[],
            ModelValidationError::Semantic { errors } => errors,
        }
    }

    pub fn is_syntactic(&self) -> bool {
        matches!(self, ModelValidationError::Syntactic { .. })
    }
}

impl From<SyntacticError> for ModelValidationError {
    fn from(error: SyntacticError) -> Self {
        ModelValidationError::Syntactic {
            message: error.message,
        }
    }
}

/// Remove duplicate errors, keeping the first occurrence of each
pub fn distinct(errors: Vec<ValidationError>) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    errors
        .into_iter()
        .filter(|error| seen.insert(error.clone()))
        .collect()
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_distinct_keeps_first_occurrence_order() {
        let a = ValidationError::new("a", "first");
        let b = ValidationError::new("b", "second");
        let errors = distinct(vec![a.clone(), b.clone(), a.clone(), b.clone()]);
        assert_eq!(errors, vec![a, b]);
    }

    #[test]
    fn test_errors_differing_in_set_name_are_distinct() {
        let plain = ValidationError::new("p", "d");
        let named = ValidationError::new("p", "d").with_validator_set_name("#/name");
        assert_eq!(distinct(vec![plain, named]).len(), 2);
    }

    #[test]
    fn test_syntactic_error_converts_to_boundary_error() {
        let error: ModelValidationError = SyntacticError::with_cause("Cannot convert", "eof").into();
        assert!(error.is_syntactic());
        assert!(error.errors().is_empty());
        assert_eq!(
            error.to_string(),
            "Syntactic model validation error: Cannot convert: eof"
        );
    }
}
