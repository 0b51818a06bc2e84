//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::schema::SchemaLoadError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaLoadError),

    #[error("Validation failed")]
    ValidationFailed,
}
