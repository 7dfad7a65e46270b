//! Injection errors.

use thiserror::Error;

use crate::params::ParameterError;

/// Injection result type
pub type Result<T> = std::result::Result<T, InjectError>;

/// Broad category of an [`InjectError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The parameter document failed validation.
    Schema,
    /// The model or run setup cannot support the requested injection.
    Configuration,
    /// A referenced subcatchment does not exist.
    NotFound,
    /// A map coordinate lies outside every subcatchment polygon.
    Placement,
    /// A split would drive an area or impervious share below zero.
    Capacity,
}

/// Errors raised while injecting LIDs into a model.
///
/// The model should be discarded after any of these; records touched before
/// the failing LID stay modified.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("invalid parameters: {}", join_errors(.0))]
    InvalidParameters(Vec<ParameterError>),

    #[error("there are no LID controls defined in the SWMM input file")]
    MissingLidControls,

    #[error("LID type \"{lid_type}\" not found in SWMM input file")]
    UnknownLidType { lid_type: String },

    #[error("unknown unit system \"{0}\"")]
    UnknownUnitSystem(String),

    #[error("unknown flow units \"{0}\" in [OPTIONS]")]
    UnknownFlowUnits(String),

    #[error("subcatchment \"{name}\" not found")]
    SubcatchmentNotFound { name: String },

    #[error("coordinates ({x}, {y}) not found in subcatchments")]
    PointOutsideSubcatchments { x: f64, y: f64 },

    #[error("LID \"{lid_id}\" pushes subcatchment \"{subcatchment}\" below 0 area")]
    NegativeArea { lid_id: String, subcatchment: String },

    #[error(
        "subcatchment \"{subcatchment}\" does not have enough impervious land left to hold LID \"{lid_id}\""
    )]
    InsufficientImpervious { lid_id: String, subcatchment: String },

    #[error("[{section}] record \"{record}\": invalid {field} \"{value}\"")]
    InvalidField {
        section: &'static str,
        record: String,
        field: &'static str,
        value: String,
    },
}

impl InjectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameters(_) => ErrorKind::Schema,
            Self::MissingLidControls
            | Self::UnknownLidType { .. }
            | Self::UnknownUnitSystem(_)
            | Self::UnknownFlowUnits(_)
            | Self::InvalidField { .. } => ErrorKind::Configuration,
            Self::SubcatchmentNotFound { .. } => ErrorKind::NotFound,
            Self::PointOutsideSubcatchments { .. } => ErrorKind::Placement,
            Self::NegativeArea { .. } | Self::InsufficientImpervious { .. } => {
                ErrorKind::Capacity
            }
        }
    }
}

fn join_errors(errors: &[ParameterError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
