//! TOML run configuration: which files to read and write.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::swmm::schema::SectionSchema;

/// Paths and schema for one injection run.
///
/// Load from TOML with [`RunConfig::from_toml_file`], or build directly and
/// check with [`RunConfig::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// SWMM input file used as the template (read, never modified).
    #[serde(default)]
    pub input_template_path: Option<PathBuf>,
    /// JSON parameter document listing the LIDs.
    #[serde(default)]
    pub input_parameters_path: Option<PathBuf>,
    /// SWMM input file to write.
    #[serde(default)]
    pub input_path: Option<PathBuf>,
    /// Optional CSV report of injected LIDs.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    /// Field position overrides.
    #[serde(default)]
    pub schema: SectionSchema,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Config key (e.g., `"input_template_path"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl RunConfig {
    /// Builds a configuration from the three required paths.
    pub fn new(template: impl Into<PathBuf>, parameters: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_template_path: Some(template.into()),
            input_parameters_path: Some(parameters.into()),
            input_path: Some(output.into()),
            ..Self::default()
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display())))?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            cfg.resolve_relative_to(base);
        }
        Ok(cfg)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.input_template_path,
            &mut self.input_parameters_path,
            &mut self.input_path,
            &mut self.report_path,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is usable: both inputs
    /// exist and the output directories exist.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (field, path) in [
            ("input_template_path", &self.input_template_path),
            ("input_parameters_path", &self.input_parameters_path),
        ] {
            match path {
                None => errors.push(ConfigError::new(field, "is required")),
                Some(p) if !p.is_file() => {
                    errors.push(ConfigError::new(field, format!("file \"{}\" does not exist", p.display())));
                }
                Some(_) => {}
            }
        }

        match &self.input_path {
            None => errors.push(ConfigError::new("input_path", "is required")),
            Some(p) => check_parent_dir("input_path", p, &mut errors),
        }
        if let Some(p) = &self.report_path {
            check_parent_dir("report_path", p, &mut errors);
        }

        errors
    }
}

fn check_parent_dir(field: &str, path: &Path, errors: &mut Vec<ConfigError>) {
    if path.is_dir() {
        errors.push(ConfigError::new(field, format!("\"{}\" is a directory", path.display())));
        return;
    }
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent.filter(|d| !d.is_dir()) {
        errors.push(ConfigError::new(
            field,
            format!("directory \"{}\" does not exist", dir.display()),
        ));
    }
}
