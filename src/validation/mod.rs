//! Validation functionality
//!
//! Layered validators turning raw model content into either acceptance or a
//! list of [`ValidationError`]s:
//! - [`name`]: naming rules shared by model types
//! - [`schema`]: JSON Schema validation with templated messages
//! - [`extensions`]: schema gate plus a pluggable semantic check for extensions files
//! - [`process_extensions`]: cross-references between process extensions and BPMN
//! - [`process`]: structural checks over BPMN process definitions
//! - [`connector`]: connector content validation
//! - [`registry`] and [`service`]: validator selection and the pipeline entry points

pub mod connector;
pub mod context;
pub mod error;
pub mod extensions;
pub mod name;
pub mod process;
pub mod process_extensions;
pub mod registry;
pub mod schema;
pub mod service;

use std::fmt;

pub use context::ValidationContext;
pub use error::{ModelValidationError, SyntacticError, ValidationError, distinct};
pub use name::NameValidator;
pub use registry::ValidatorRegistry;
pub use service::ModelValidationService;

/// What part of a model a validator looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationConcern {
    /// The main content file, e.g. BPMN XML
    Content,
    /// The extensions file stored next to the content
    Extensions,
}

impl fmt::Display for ValidationConcern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationConcern::Content => write!(f, "content"),
            ValidationConcern::Extensions => write!(f, "extensions"),
        }
    }
}

/// A validator for one concern of one model type
///
/// Validators are stateless; all input arrives with the call, so one instance
/// can serve concurrent validations.
pub trait ModelValidator: Send + Sync + fmt::Debug {
    /// Model type this validator is registered for; `None` for generic validators
    fn handled_model_type(&self) -> Option<&str>;

    fn concern(&self) -> ValidationConcern;

    /// Validate raw content
    ///
    /// Returns the semantic errors found, or a [`SyntacticError`] when the
    /// content cannot be parsed at all.
    fn validate(
        &self,
        content: &[u8],
        context: &ValidationContext<'_>,
    ) -> Result<Vec<ValidationError>, SyntacticError>;
}
