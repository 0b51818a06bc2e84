//! Model and model type definitions

use serde::{Deserialize, Serialize};

/// Model type name of BPMN process definitions
pub const PROCESS: &str = "PROCESS";
/// Model type name of connector definitions
pub const CONNECTOR: &str = "CONNECTOR";

/// Content type of the main file of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Json,
    Xml,
}

impl ContentType {
    /// File extension used for content of this type
    pub fn file_extension(&self) -> &'static str {
        match self {
            ContentType::Json => "json",
            ContentType::Xml => "xml",
        }
    }
}

/// A kind of model handled by the modeling repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelType {
    /// Upper case type name, e.g. `PROCESS`
    pub name: String,
    /// Content type of the model's main file
    pub content_type: ContentType,
}

impl ModelType {
    /// Create a new model type
    pub fn new(name: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            name: name.into(),
            content_type,
        }
    }

    /// Create a model type with JSON content
    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, ContentType::Json)
    }

    /// Create a model type with XML content
    pub fn xml(name: impl Into<String>) -> Self {
        Self::new(name, ContentType::Xml)
    }

    /// Prefix of the extensions model ids of this type, e.g. `process-`
    pub fn id_prefix(&self) -> String {
        id_prefix(&self.name)
    }

    /// Check whether this type has the given name (case-insensitive)
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Model types known out of the box
    pub fn defaults() -> Vec<ModelType> {
        vec![
            ModelType::xml(PROCESS),
            ModelType::json(CONNECTOR),
            ModelType::json("FORM"),
            ModelType::xml("DECISION"),
            ModelType::json("SCRIPT"),
            ModelType::json("TRIGGER"),
            ModelType::json("UI"),
        ]
    }
}

/// Prefix of the extensions model ids for a model type name
pub fn id_prefix(model_type: &str) -> String {
    format!("{}-", model_type.to_lowercase())
}

/// A model visible to the validators
///
/// Only the main content is carried here; extensions are validated as their
/// own content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Model id, e.g. the process definition id for process models
    pub id: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Model type name, e.g. `PROCESS`
    pub model_type: String,
    /// Raw content bytes
    #[serde(default)]
    pub content: Vec<u8>,
}

impl Model {
    /// Create a new model
    pub fn new(id: impl Into<String>, model_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            name: None,
            model_type: model_type.into(),
            content: content.into(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether the model carries any content
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    /// Whether the model is of the given type (case-insensitive)
    pub fn is_of_type(&self, model_type: &str) -> bool {
        self.model_type.eq_ignore_ascii_case(model_type)
    }
}
