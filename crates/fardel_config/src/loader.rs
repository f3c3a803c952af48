//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates a `fardel.toml` configuration from a project directory.
///
/// Reads `<project_dir>/fardel.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("fardel.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `fardel.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and bundle declarations are consistent.
///
/// All configuration problems are fatal before any compilation work begins.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.bundles.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one [bundles.*] declaration is required".to_string(),
        ));
    }
    for (name, decl) in &config.bundles {
        match (&decl.entry, &decl.split) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ValidationError(format!(
                    "bundle '{name}' declares both 'entry' and 'split'"
                )));
            }
            (None, None) => {
                return Err(ConfigError::ValidationError(format!(
                    "bundle '{name}' must declare either 'entry' or 'split'"
                )));
            }
            _ => {}
        }
        if decl.dest.is_empty() {
            return Err(ConfigError::MissingField(format!("bundles.{name}.dest")));
        }
    }
    Ok(())
}
