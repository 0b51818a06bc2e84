//! Validate command implementation

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::{debug, info};

use crate::cli::error::CliError;
use crate::cli::output::{ValidationReport, format_json, format_text};
use crate::config::ValidationConfig;
use crate::models::Model;
use crate::validation::{ModelValidationService, ValidationConcern, ValidationContext};

/// Suffix of extensions files; these are never part of the context
const EXTENSIONS_SUFFIX: &str = "-extensions.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Model type of the input, e.g. PROCESS or CONNECTOR
    #[arg(short = 't', long = "type")]
    pub model_type: String,

    /// File to validate, or `-` for stdin
    #[arg(short, long)]
    pub input: String,

    /// Validate the input as the extensions file of the model
    #[arg(long)]
    pub extensions: bool,

    /// Project directory with one sub-directory per model type,
    /// e.g. `processes/` and `connectors/`
    #[arg(short, long)]
    pub context: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Load input content from file or stdin
fn load_input(input: &str) -> Result<Vec<u8>, CliError> {
    if input == "-" {
        let mut content = Vec::new();
        std::io::stdin()
            .read_to_end(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Model type a context sub-directory holds, e.g. `connectors` → `CONNECTOR`
fn directory_model_type(config: &ValidationConfig, dir_name: &str) -> Option<String> {
    let dir_name = dir_name.to_lowercase();
    config
        .model_types
        .iter()
        .map(|t| t.name.to_lowercase())
        .find(|name| {
            dir_name == *name || dir_name == format!("{}s", name) || dir_name == format!("{}es", name)
        })
        .map(|name| name.to_uppercase())
}

/// Model id of a context file: its name up to the first `.`
fn model_id(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let id = file_name.split('.').next().unwrap_or(file_name);
    (!id.is_empty()).then(|| id.to_string())
}

/// Load the models of a project directory
pub fn load_context(config: &ValidationConfig, root: &Path) -> Result<Vec<Model>, CliError> {
    let read_dir = |dir: &Path| {
        std::fs::read_dir(dir).map_err(|e| CliError::FileReadError(dir.to_path_buf(), e.to_string()))
    };

    let mut models = Vec::new();
    for entry in read_dir(root)? {
        let entry = entry.map_err(|e| CliError::FileReadError(root.to_path_buf(), e.to_string()))?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let Some(model_type) = dir
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| directory_model_type(config, n))
        else {
            debug!(dir = %dir.display(), "Skipping directory of unknown model type");
            continue;
        };

        let mut paths: Vec<PathBuf> = read_dir(&dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .filter(|p| {
                !p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(EXTENSIONS_SUFFIX))
            })
            .collect();
        paths.sort();

        for path in paths {
            let Some(id) = model_id(&path) else {
                continue;
            };
            let content =
                std::fs::read(&path).map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
            models.push(Model::new(id, model_type.clone(), content));
        }
    }

    info!(count = models.len(), root = %root.display(), "Loaded context models");
    Ok(models)
}

/// Handle the validate command
pub fn handle_validate(args: &ValidateArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => ValidationConfig::from_file(path)?,
        None => ValidationConfig::default(),
    };
    if config.model_type(&args.model_type).is_none() {
        return Err(CliError::InvalidArgument(format!(
            "Unknown model type: {}",
            args.model_type
        )));
    }

    let content = load_input(&args.input)?;
    let models = match &args.context {
        Some(root) => load_context(&config, root)?,
        None => Vec::new(),
    };
    let context = ValidationContext::new(&models);

    let service = ModelValidationService::new(config)?;
    let concern = if args.extensions {
        ValidationConcern::Extensions
    } else {
        ValidationConcern::Content
    };
    let outcome = match concern {
        ValidationConcern::Content => service.validate_content(&args.model_type, &content, &context),
        ValidationConcern::Extensions => {
            service.validate_extensions(&args.model_type, &content, &context)
        }
    };

    let report = ValidationReport::new(&args.model_type, concern, &outcome);
    match args.format {
        OutputFormat::Text => print!("{}", format_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            format_json(&report).map_err(|e| CliError::InvalidArgument(e.to_string()))?
        ),
    }

    if report.valid {
        Ok(())
    } else {
        Err(CliError::ValidationFailed)
    }
}

#[cfg(test)]
mod validate_command_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_names_map_to_types() {
        let config = ValidationConfig::default();
        assert_eq!(directory_model_type(&config, "processes").as_deref(), Some("PROCESS"));
        assert_eq!(directory_model_type(&config, "connectors").as_deref(), Some("CONNECTOR"));
        assert_eq!(directory_model_type(&config, "ui").as_deref(), Some("UI"));
        assert_eq!(directory_model_type(&config, "reports"), None);
    }

    #[test]
    fn test_load_context_skips_extensions_files() {
        let root = TempDir::new().unwrap();
        let processes = root.path().join("processes");
        std::fs::create_dir(&processes).unwrap();
        std::fs::write(processes.join("process-1.bpmn20.xml"), "<definitions/>").unwrap();
        std::fs::write(processes.join("process-1-extensions.json"), "{}").unwrap();
        std::fs::create_dir(root.path().join("misc")).unwrap();

        let models = load_context(&ValidationConfig::default(), root.path()).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "process-1");
        assert_eq!(models[0].model_type, "PROCESS");
    }
}
