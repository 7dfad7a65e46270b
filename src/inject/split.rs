//! Carving a land-occupying LID's footprint out of its host subcatchment.
//!
//! The host keeps its impervious *area* minus the LID footprint, because the
//! footprint is assumed to sit on former impervious land (roofs and paving
//! for rain barrels). That is a modelling assumption for rain-barrel-class
//! controls, not a conservation law that holds for every LID.

use crate::error::{InjectError, Result};
use crate::swmm::SUBCATCHMENTS;
use crate::swmm::schema::Subcatchment;
use crate::units::{Area, Fraction, UnitSystem};

/// Areas closer than this to zero (zone-area units) are rounding noise and
/// clamp to zero.
const TOLERANCE: f64 = 1e-9;

/// Outcome of splitting a host subcatchment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    /// Total LID footprint, which becomes the child subcatchment's area.
    pub lid_area: Area,
    /// Host area after the footprint is removed.
    pub host_area: Area,
    /// Host impervious share after the footprint is removed.
    pub host_imperv: Fraction,
}

impl Split {
    /// Host record with its reduced area and impervious share.
    pub fn host_record(&self, host: &Subcatchment, units: UnitSystem) -> Subcatchment {
        Subcatchment {
            name: host.name.clone(),
            area: self.host_area.to(units.zone_area_unit()),
            imperv_pct: self.host_imperv.percent(),
        }
    }

    /// Child record holding the LID footprint; it has no impervious area.
    pub fn child_record(&self, name: String, units: UnitSystem) -> Subcatchment {
        Subcatchment {
            name,
            area: self.lid_area.to(units.zone_area_unit()),
            imperv_pct: 0.0,
        }
    }
}

/// Computes the split for `number` LID units of `unit_area` each (in the
/// LID area unit of `units`) placed in `host`.
///
/// # Errors
///
/// `NegativeArea` if the footprint exceeds the host's area,
/// `InsufficientImpervious` if it exceeds the host's impervious area,
/// `InvalidField` if the host's impervious share is outside 0-100 %.
pub fn split_subcatchment(
    host: &Subcatchment,
    number: u32,
    unit_area: f64,
    units: UnitSystem,
    lid_id: &str,
) -> Result<Split> {
    let zone_unit = units.zone_area_unit();

    if host.area < 0.0 {
        return Err(invalid_host(host, "area", host.area));
    }
    if !(0.0..=100.0).contains(&host.imperv_pct) {
        return Err(invalid_host(host, "%imperv", host.imperv_pct));
    }

    let lid_area = f64::from(number) * Area::new(unit_area, units.lid_area_unit());
    let old_area = Area::new(host.area, zone_unit);

    let host_area = clamp_area(old_area - lid_area, units).ok_or_else(|| InjectError::NegativeArea {
        lid_id: lid_id.to_string(),
        subcatchment: host.name.clone(),
    })?;

    let old_imperv_area = Fraction::from_percent(host.imperv_pct) * old_area;
    let imperv_area = clamp_area(old_imperv_area - lid_area, units).ok_or_else(|| {
        InjectError::InsufficientImpervious {
            lid_id: lid_id.to_string(),
            subcatchment: host.name.clone(),
        }
    })?;

    let host_imperv = if host_area.to(zone_unit) > 0.0 {
        let share = imperv_area / host_area;
        if share.ratio() > 1.0 {
            Fraction::from_percent(100.0)
        } else {
            share
        }
    } else {
        Fraction::ZERO
    };

    Ok(Split {
        lid_area,
        host_area,
        host_imperv,
    })
}

fn clamp_area(area: Area, units: UnitSystem) -> Option<Area> {
    let magnitude = area.to(units.zone_area_unit());
    if magnitude.abs() < TOLERANCE {
        Some(Area::ZERO)
    } else if magnitude > 0.0 {
        Some(area)
    } else {
        None
    }
}

fn invalid_host(host: &Subcatchment, field: &'static str, value: f64) -> InjectError {
    InjectError::InvalidField {
        section: SUBCATCHMENTS,
        record: host.name.clone(),
        field,
        value: value.to_string(),
    }
}
