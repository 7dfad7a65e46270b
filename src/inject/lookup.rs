//! Name lookups in `[SUBCATCHMENTS]` and `[LID_CONTROLS]`.

use crate::error::{InjectError, Result};
use crate::swmm::schema::{LidControl, LidControlFields, SubcatchmentFields};
use crate::swmm::{LID_CONTROLS, Model, SUBCATCHMENTS};

/// Position of the subcatchment record named `name` within
/// `[SUBCATCHMENTS]`.
pub fn subcatchment_index(model: &Model, fields: &SubcatchmentFields, name: &str) -> Option<usize> {
    model
        .section(SUBCATCHMENTS)?
        .lines
        .iter()
        .position(|line| line.is_data() && fields.name(line) == Some(name))
}

pub fn subcatchment_exists(model: &Model, fields: &SubcatchmentFields, name: &str) -> bool {
    subcatchment_index(model, fields, name).is_some()
}

/// Looks up the `Name Type` record of LID control `lid_type`.
///
/// # Errors
///
/// `MissingLidControls` if the model has no `[LID_CONTROLS]` section,
/// `UnknownLidType` if no control has that name.
pub fn lid_control(model: &Model, fields: &LidControlFields, lid_type: &str) -> Result<LidControl> {
    let section = model.section(LID_CONTROLS).ok_or(InjectError::MissingLidControls)?;
    let line = section
        .data_lines()
        .find(|line| fields.name(line) == Some(lid_type))
        .ok_or_else(|| InjectError::UnknownLidType {
            lid_type: lid_type.to_string(),
        })?;
    fields.read(line)
}
