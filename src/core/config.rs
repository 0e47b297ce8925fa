//! Column mapping files
//!
//! A mapping is stored as JSON or YAML; the file extension picks the format.
//! Fields missing from a file take their default values, so a partial mapping
//! only needs the columns that differ from the defaults.

use miette::Diagnostic;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::entities::mapping::ColumnMapping;

/// Default mapping file name written by `config init`
pub const DEFAULT_MAPPING_FILE: &str = "lineup.yaml";

/// Errors that can occur while reading or writing a mapping file
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Unsupported mapping file extension: {0}")]
    #[diagnostic(
        code(lineup::config::extension),
        help("Use a .json, .yaml or .yml file")
    )]
    UnknownExtension(String),

    #[error("Failed to parse JSON mapping: {message}")]
    #[diagnostic(code(lineup::config::json))]
    JsonError { message: String },

    #[error("Failed to parse YAML mapping: {message}")]
    #[diagnostic(code(lineup::config::yaml))]
    YamlError { message: String },

    #[error("Mapping file already exists: {0}")]
    #[diagnostic(help("Pass --force to overwrite it"))]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MappingFormat {
    Json,
    Yaml,
}

impl MappingFormat {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(MappingFormat::Json),
            "yaml" | "yml" => Ok(MappingFormat::Yaml),
            _ => Err(ConfigError::UnknownExtension(path.display().to_string())),
        }
    }
}

/// Load a mapping from a JSON or YAML file
pub fn load_mapping(path: &Path) -> Result<ColumnMapping, ConfigError> {
    let format = MappingFormat::of(path)?;
    let contents = fs::read_to_string(path)?;
    let mapping = match format {
        MappingFormat::Json => serde_json::from_str(&contents).map_err(|e| ConfigError::JsonError {
            message: e.to_string(),
        })?,
        MappingFormat::Yaml => serde_yml::from_str(&contents).map_err(|e| ConfigError::YamlError {
            message: e.to_string(),
        })?,
    };
    debug!(path = %path.display(), "loaded column mapping");
    Ok(mapping)
}

/// Render a mapping in the format implied by `path`
pub fn render_mapping(mapping: &ColumnMapping, path: &Path) -> Result<String, ConfigError> {
    match MappingFormat::of(path)? {
        MappingFormat::Json => {
            serde_json::to_string_pretty(mapping).map_err(|e| ConfigError::JsonError {
                message: e.to_string(),
            })
        }
        MappingFormat::Yaml => serde_yml::to_string(mapping).map_err(|e| ConfigError::YamlError {
            message: e.to_string(),
        }),
    }
}

/// Write a mapping file, refusing to replace an existing one unless `force`
pub fn save_mapping(mapping: &ColumnMapping, path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.display().to_string()));
    }
    let contents = render_mapping(mapping, path)?;
    fs::write(path, contents)?;
    debug!(path = %path.display(), "saved column mapping");
    Ok(())
}
