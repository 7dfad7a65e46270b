//! Injection of Low-Impact-Development (LID) controls into SWMM 5 input
//! models.

pub mod cli;
/// TOML run configuration.
pub mod config;
pub mod error;
/// LID placement, subcatchment splitting, and usage records.
pub mod inject;
/// Report export.
pub mod io {
    pub mod export;
}
pub mod params;
pub mod run;
/// SWMM input model, reader, writer, and section schema.
pub mod swmm;
pub mod units;

pub use error::{ErrorKind, InjectError};
pub use inject::{InjectionReport, inject};
