//! Name validation
//!
//! Model names end up in resource identifiers, so by default they follow the
//! DNS-1035 label rules: lower case alphanumerics or `-`, starting and ending
//! with an alphanumeric, at most 26 characters.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Pattern every DNS-1035 compliant name matches
pub const DNS_LABEL_PATTERN: &str = "^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

/// Default maximum name length
pub const NAME_MAX_LENGTH: usize = 26;

static DNS_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(DNS_LABEL_PATTERN).unwrap());

/// Stateless checks on a model name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameValidator {
    max_length: Option<usize>,
    dns_convention: bool,
}

impl Default for NameValidator {
    fn default() -> Self {
        Self {
            max_length: Some(NAME_MAX_LENGTH),
            dns_convention: true,
        }
    }
}

impl NameValidator {
    /// Validator enforcing the DNS-1035 rules and the default length limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator that only requires a non-blank name
    pub fn presence_only() -> Self {
        Self {
            max_length: None,
            dns_convention: false,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Validate a name
    ///
    /// `kind` is the human readable label of what is named, e.g. `connector`.
    /// Every rule that applies reports its own error; a missing name reports
    /// only that it is required.
    pub fn validate(&self, name: Option<&str>, kind: &str) -> Vec<ValidationError> {
        let Some(name) = name else {
            return vec![ValidationError::new(
                "field.required",
                format!("The {} name is required", kind),
            )];
        };

        let mut errors = Vec::new();

        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                "field.empty",
                format!("The {} name cannot be empty", kind),
            ));
        }

        let too_long = self
            .max_length
            .is_some_and(|max_length| name.chars().count() > max_length);

        if let Some(max_length) = self.max_length.filter(|_| too_long) {
            errors.push(ValidationError::new(
                "length.greater",
                format!(
                    "The {} name length cannot be greater than {}: '{}'",
                    kind, max_length, name
                ),
            ));
        }

        // A DNS label is bounded, so an overlong name never matches
        if self.dns_convention && (too_long || !DNS_LABEL_REGEX.is_match(name)) {
            errors.push(ValidationError::new(
                "regex.mismatch",
                format!(
                    "The {} name should follow DNS-1035 conventions: it must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character: '{}'",
                    kind, name
                ),
            ));
        }

        errors
    }
}
