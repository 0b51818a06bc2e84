//! Validation configuration
//!
//! Settings for the validation pipeline. Every field has a default, so a
//! configuration file only needs the values it changes:
//!
//! ```toml
//! require_user_task_assignee = true
//! builtin_implementations = ["script.EXECUTE", "my-service.RUN"]
//! enabled_checks = ["engine", "unique-id", "flows"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::model::{CONNECTOR, ModelType, PROCESS};
use crate::validation::name::NAME_MAX_LENGTH;

/// Errors while loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("IO error with {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are inconsistent
    #[error("Configuration error: {0}")]
    Invalid(String),
}

/// Main validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Model type name of process definitions
    pub process_type: String,
    /// Model type name of connectors
    pub connector_type: String,
    /// Model types known to the registry
    pub model_types: Vec<ModelType>,
    /// Maximum length of model names
    pub name_max_length: usize,
    /// Report user tasks without assignee or candidates
    pub require_user_task_assignee: bool,
    /// Service task implementations accepted without a connector model
    pub builtin_implementations: Vec<String>,
    /// Structural checks to run (empty = all)
    pub enabled_checks: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            process_type: PROCESS.to_string(),
            connector_type: CONNECTOR.to_string(),
            model_types: ModelType::defaults(),
            name_max_length: NAME_MAX_LENGTH,
            require_user_task_assignee: false,
            builtin_implementations: vec![
                "script.EXECUTE".to_string(),
                "dmn-connector.EXECUTE_TABLE".to_string(),
                "email-service.SEND".to_string(),
                "docgen-service.GENERATE".to_string(),
            ],
            enabled_checks: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Create a new validation config
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Set the process model type name
    pub fn with_process_type(mut self, name: impl Into<String>) -> Self {
        self.process_type = name.into();
        self
    }

    /// Register an additional model type
    pub fn with_model_type(mut self, model_type: ModelType) -> Self {
        if !self.model_types.iter().any(|t| t.is(&model_type.name)) {
            self.model_types.push(model_type);
        }
        self
    }

    /// Set the maximum name length
    pub fn with_name_max_length(mut self, max_length: usize) -> Self {
        self.name_max_length = max_length;
        self
    }

    /// Require an assignee or candidates on user tasks
    pub fn with_require_user_task_assignee(mut self, required: bool) -> Self {
        self.require_user_task_assignee = required;
        self
    }

    /// Accept an additional service task implementation without a connector
    pub fn with_builtin_implementation(mut self, implementation: impl Into<String>) -> Self {
        self.builtin_implementations.push(implementation.into());
        self
    }

    /// Restrict the structural checks that run
    pub fn with_enabled_checks(mut self, checks: Vec<String>) -> Self {
        self.enabled_checks = checks;
        self
    }

    /// Check if a structural check should run
    pub fn is_check_enabled(&self, name: &str) -> bool {
        self.enabled_checks.is_empty() || self.enabled_checks.iter().any(|c| c == name)
    }

    /// Find a known model type by name (case-insensitive)
    pub fn model_type(&self, name: &str) -> Option<&ModelType> {
        self.model_types.iter().find(|t| t.is(name))
    }

    /// Check whether an implementation is accepted without a connector model
    pub fn is_builtin_implementation(&self, implementation: &str) -> bool {
        self.builtin_implementations.iter().any(|i| i == implementation)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_type.trim().is_empty() {
            return Err(ConfigError::Invalid("process_type cannot be empty".to_string()));
        }
        if self.connector_type.trim().is_empty() {
            return Err(ConfigError::Invalid("connector_type cannot be empty".to_string()));
        }
        if self.name_max_length == 0 {
            return Err(ConfigError::Invalid(
                "name_max_length must be greater than 0".to_string(),
            ));
        }
        if self.model_type(&self.process_type).is_none() {
            return Err(ConfigError::Invalid(format!(
                "process type '{}' is not a known model type",
                self.process_type
            )));
        }
        Ok(())
    }
}
