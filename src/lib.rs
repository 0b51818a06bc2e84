//! Modeling Validation - validation pipeline for modeling repository content
//!
//! Validates uploaded model content before it is accepted:
//! - BPMN process definitions (XML), checked by an ordered chain of structural validators
//! - Connector definitions (JSON), checked against the connector schema
//! - Extensions documents (JSON) describing process variables and task mappings,
//!   cross-checked against the sibling process definition
//!
//! Every entry point returns either success, a single syntactic failure, or the
//! full list of semantic [`ValidationError`]s.

pub mod cli;
pub mod config;
pub mod import;
pub mod models;
pub mod validation;

pub use config::{ConfigError, ValidationConfig};
pub use import::{BpmnImporter, ConnectorImporter, ExtensionsImporter, ImportError};
pub use models::{
    BpmnDocument, ConnectorModelContent, ContentType, Extensions, ExtensionsModel, Model,
    ModelType,
};
pub use validation::{
    ModelValidationError, ModelValidationService, ModelValidator, NameValidator,
    SyntacticError, ValidationConcern, ValidationContext, ValidationError, ValidatorRegistry,
};
