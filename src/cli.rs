//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, RunConfig};

/// Inject LID controls into a SWMM input file.
#[derive(Parser, Debug)]
#[command(name = "lid-inject")]
#[command(about = "Inject Low-Impact-Development controls into a SWMM input file")]
pub struct CliOptions {
    /// Load paths (and schema overrides) from a TOML run configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SWMM input file to use as the template
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// JSON parameter document listing the LIDs
    #[arg(long)]
    pub parameters: Option<PathBuf>,

    /// SWMM input file to write
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write a CSV summary of the injected LIDs
    #[arg(long)]
    pub report_out: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    pub verbose: bool,
}

impl CliOptions {
    /// Builds the run configuration: `--config` first, then path flags on top.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration file cannot be loaded.
    /// Missing paths are reported later by [`RunConfig::validate`].
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::from_toml_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(p) = &self.template {
            cfg.input_template_path = Some(p.clone());
        }
        if let Some(p) = &self.parameters {
            cfg.input_parameters_path = Some(p.clone());
        }
        if let Some(p) = &self.output {
            cfg.input_path = Some(p.clone());
        }
        if let Some(p) = &self.report_out {
            cfg.report_path = Some(p.clone());
        }
        Ok(cfg)
    }
}
