//! Import functionality
//!
//! Provides parsers turning raw model content into typed models:
//! - BPMN 2.0 process definitions (XML)
//! - Connector definitions (JSON)
//! - Extensions documents (JSON)

pub mod bpmn;
pub mod connector;
pub mod extensions;

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Content is not present")]
    EmptyContent,
    #[error("Content is not valid UTF-8: {0}")]
    EncodingError(#[from] std::str::Utf8Error),
    #[error("XML parsing error at position {position}: {message}")]
    XmlError { position: u64, message: String },
    #[error("Invalid BPMN: {0}")]
    InvalidBpmn(String),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// Re-export for convenience
pub use bpmn::BpmnImporter;
pub use connector::ConnectorImporter;
pub use extensions::ExtensionsImporter;
