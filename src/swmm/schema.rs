//! Field positions per section, plus typed views over the records the
//! injector reads and writes.
//!
//! Positions default to the SWMM 5 layout and may be overridden from the
//! `[schema]` table of the run configuration.

use serde::Deserialize;

use super::{LID_CONTROLS, Line, POLYGONS, SUBCATCHMENTS};
use crate::error::{InjectError, Result};

/// Field positions for every section the injector touches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionSchema {
    pub subcatchments: SubcatchmentFields,
    pub polygons: PolygonFields,
    pub lid_controls: LidControlFields,
    pub options: OptionFields,
}

/// `[SUBCATCHMENTS]`: `Name RainGage Outlet Area %Imperv Width %Slope CurbLen`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubcatchmentFields {
    pub name: usize,
    pub area: usize,
    pub imperv: usize,
}

impl Default for SubcatchmentFields {
    fn default() -> Self {
        Self {
            name: 0,
            area: 3,
            imperv: 4,
        }
    }
}

/// `[POLYGONS]`: `Subcatchment X-Coord Y-Coord`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolygonFields {
    pub subcatchment: usize,
    pub x: usize,
    pub y: usize,
}

impl Default for PolygonFields {
    fn default() -> Self {
        Self {
            subcatchment: 0,
            x: 1,
            y: 2,
        }
    }
}

/// `[LID_CONTROLS]`: the first record of a control is `Name Type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LidControlFields {
    pub name: usize,
    pub category: usize,
}

impl Default for LidControlFields {
    fn default() -> Self {
        Self {
            name: 0,
            category: 1,
        }
    }
}

/// `[OPTIONS]`: `Option Value`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionFields {
    pub key: usize,
    pub value: usize,
}

impl Default for OptionFields {
    fn default() -> Self {
        Self { key: 0, value: 1 }
    }
}

impl SubcatchmentFields {
    pub fn name<'a>(&self, line: &'a Line) -> Option<&'a str> {
        line.value(self.name)
    }

    /// Parses the area and impervious share of a record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if either value is missing or not a number.
    pub fn read(&self, line: &Line) -> Result<Subcatchment> {
        let name = self.name(line).unwrap_or_default().to_string();
        let area = parse_number(line, self.area, SUBCATCHMENTS, &name, "area")?;
        let imperv_pct = parse_number(line, self.imperv, SUBCATCHMENTS, &name, "%imperv")?;
        Ok(Subcatchment {
            name,
            area,
            imperv_pct,
        })
    }

    /// Writes name, area and impervious share back into `line`.
    pub fn write(&self, sc: &Subcatchment, line: &mut Line) {
        line.set_value(self.name, sc.name.clone());
        line.set_value(self.area, format_number(sc.area));
        line.set_value(self.imperv, format_number(sc.imperv_pct));
    }
}

impl PolygonFields {
    /// Parses one vertex record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if a coordinate is missing or not a number.
    pub fn read(&self, line: &Line) -> Result<PolygonVertex> {
        let subcatchment = line.value(self.subcatchment).unwrap_or_default().to_string();
        let x = parse_number(line, self.x, POLYGONS, &subcatchment, "x-coord")?;
        let y = parse_number(line, self.y, POLYGONS, &subcatchment, "y-coord")?;
        Ok(PolygonVertex { subcatchment, x, y })
    }
}

impl LidControlFields {
    pub fn name<'a>(&self, line: &'a Line) -> Option<&'a str> {
        line.value(self.name)
    }

    /// Reads the structural category of a control's `Name Type` record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the record has no category value.
    pub fn read(&self, line: &Line) -> Result<LidControl> {
        let name = self.name(line).unwrap_or_default().to_string();
        let category = line.value(self.category).ok_or_else(|| InjectError::InvalidField {
            section: LID_CONTROLS,
            record: name.clone(),
            field: "type",
            value: String::new(),
        })?;
        Ok(LidControl {
            category: LidCategory::from_code(category),
            name,
        })
    }
}

impl OptionFields {
    /// Returns the value of option `key` (case-insensitive) in `lines`.
    pub fn lookup<'a>(&self, lines: &'a [Line], key: &str) -> Option<&'a str> {
        lines
            .iter()
            .filter(|l| l.is_data())
            .find(|l| l.value(self.key).is_some_and(|k| k.eq_ignore_ascii_case(key)))
            .and_then(|l| l.value(self.value))
    }
}

/// A subcatchment's area (model zone-area units) and impervious share (%).
#[derive(Debug, Clone, PartialEq)]
pub struct Subcatchment {
    pub name: String,
    pub area: f64,
    pub imperv_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonVertex {
    pub subcatchment: String,
    pub x: f64,
    pub y: f64,
}

/// Structural category codes of SWMM LID controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LidCategory {
    BioRetentionCell,
    RainGarden,
    GreenRoof,
    InfiltrationTrench,
    PermeablePavement,
    RainBarrel,
    RooftopDisconnection,
    VegetativeSwale,
    Other(String),
}

impl LidCategory {
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "BC" => Self::BioRetentionCell,
            "RG" => Self::RainGarden,
            "GR" => Self::GreenRoof,
            "IT" => Self::InfiltrationTrench,
            "PP" => Self::PermeablePavement,
            "RB" => Self::RainBarrel,
            "RD" => Self::RooftopDisconnection,
            "VS" => Self::VegetativeSwale,
            _ => Self::Other(code.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::BioRetentionCell => "BC",
            Self::RainGarden => "RG",
            Self::GreenRoof => "GR",
            Self::InfiltrationTrench => "IT",
            Self::PermeablePavement => "PP",
            Self::RainBarrel => "RB",
            Self::RooftopDisconnection => "RD",
            Self::VegetativeSwale => "VS",
            Self::Other(code) => code,
        }
    }

    /// Whether LIDs of this category carve their footprint out of the host
    /// subcatchment.
    pub fn occupies_land(&self) -> bool {
        matches!(self, Self::RainBarrel)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LidControl {
    pub name: String,
    pub category: LidCategory,
}

fn parse_number(
    line: &Line,
    index: usize,
    section: &'static str,
    record: &str,
    field: &'static str,
) -> Result<f64> {
    let raw = line.value(index).unwrap_or_default();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InjectError::InvalidField {
            section,
            record: record.to_string(),
            field,
            value: raw.to_string(),
        })
}

/// Shortest decimal text that parses back to `value`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid writing "-0"
        "0".to_string()
    } else {
        value.to_string()
    }
}
