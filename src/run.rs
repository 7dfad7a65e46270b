//! File-to-file injection driven by a [`RunConfig`].

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, RunConfig};
use crate::error::InjectError;
use crate::inject::{InjectionReport, inject};
use crate::io::export::export_report_csv;
use crate::params::{ParameterDocument, ParameterError};
use crate::swmm::{Model, ModelError};

/// Anything that can stop a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{}", join(.0))]
    Config(Vec<ConfigError>),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("invalid parameter document: {0}")]
    Parameters(#[from] ParameterError),

    #[error(transparent)]
    Inject(#[from] InjectError),

    #[error("cannot write report \"{path}\": {source}")]
    Report { path: String, source: std::io::Error },
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads the template and parameters, injects, and writes the output model
/// (and the report, when configured).
///
/// # Errors
///
/// Returns a `RunError` for invalid configuration, unreadable or malformed
/// inputs, any injection failure, or an output write failure. Nothing is
/// written unless injection succeeds.
pub fn perform_injection(config: &RunConfig) -> Result<InjectionReport, RunError> {
    let errors = config.validate();
    let (Some(template), Some(parameters), Some(output)) = (
        config.input_template_path.as_deref(),
        config.input_parameters_path.as_deref(),
        config.input_path.as_deref(),
    ) else {
        return Err(RunError::Config(errors));
    };
    if !errors.is_empty() {
        return Err(RunError::Config(errors));
    }

    info!(template = %template.display(), "reading model");
    let mut model = Model::from_path(template)?;
    info!(parameters = %parameters.display(), "reading parameters");
    let params = ParameterDocument::from_json_path(parameters)?;

    let report = inject(&params, &mut model, &config.schema)?;

    model.write_to_path(output)?;
    info!(output = %output.display(), "wrote model");

    if let Some(path) = &config.report_path {
        export_report_csv(&report, path).map_err(|source| RunError::Report {
            path: path.display().to_string(),
            source,
        })?;
        info!(report = %path.display(), "wrote injection report");
    }

    Ok(report)
}
