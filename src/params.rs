//! JSON parameter document describing the LIDs to inject.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Top-level parameter document.
///
/// ```
/// use lid_inject::params::{ParameterDocument, Placement};
///
/// let doc = ParameterDocument::from_json_str(r#"{
///     "lids": [{
///         "type": "RB1",
///         "location": {"subcatchment": "S1"},
///         "number": 1, "area": 50, "width": 0,
///         "initSat": 0, "fromImp": 100, "toPerv": 0
///     }]
/// }"#).unwrap();
/// assert_eq!(doc.lids[0].location, Placement::Subcatchment("S1".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDocument {
    #[serde(default)]
    pub lids: Vec<LidEntry>,
}

/// One LID usage to add to the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LidEntry {
    /// Name of a control defined in `[LID_CONTROLS]`.
    #[serde(rename = "type")]
    pub lid_type: String,
    /// Where the LID is built.
    pub location: Placement,
    /// Where the LID's underdrain discharges, if not the host outlet.
    #[serde(default)]
    pub drain_to: Option<DrainTarget>,
    /// Number of replicate units.
    pub number: u32,
    /// Surface area of one unit (ft² or m²).
    pub area: f64,
    /// Top width of overland flow surface of one unit (ft or m).
    pub width: f64,
    /// Initial saturation of the soil and storage layers (%).
    pub init_sat: f64,
    /// Impervious area treated by the LID (%).
    pub from_imp: f64,
    /// 1 if outflow is routed to the pervious area, else 0.
    pub to_perv: u8,
    /// Optional detailed report file.
    #[serde(default)]
    pub rpt_file: Option<String>,
}

/// A LID location: a named subcatchment or a map coordinate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Subcatchment(String),
    Map(MapPoint),
}

/// A drain target: a subcatchment, a map coordinate, or a network node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrainTarget {
    Subcatchment(String),
    Map(MapPoint),
    Node(String),
}

/// Map coordinates in the model's `[POLYGONS]` coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

/// A parameter document problem, located by JSON path.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("at `{path}`: {message}")]
pub struct ParameterError {
    /// JSON path, e.g. `$.lids[0].number`.
    pub path: String,
    pub message: String,
}

impl ParameterError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ParameterDocument {
    /// Reads and parses a parameter document.
    ///
    /// # Errors
    ///
    /// Returns a `ParameterError` if the file cannot be read or is not a
    /// well-formed document.
    pub fn from_json_path(path: &Path) -> Result<Self, ParameterError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ParameterError::new("$", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses a parameter document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a `ParameterError` for malformed JSON, unknown keys, or
    /// values of the wrong type.
    pub fn from_json_str(s: &str) -> Result<Self, ParameterError> {
        serde_json::from_str(s).map_err(|e| ParameterError::new("$", e.to_string()))
    }

    /// Validates value ranges and returns every problem found.
    ///
    /// Returns an empty vector if the document is valid.
    pub fn validate(&self) -> Vec<ParameterError> {
        let mut errors = Vec::new();
        for (i, lid) in self.lids.iter().enumerate() {
            lid.validate(&format!("$.lids[{i}]"), &mut errors);
        }
        errors
    }
}

impl LidEntry {
    fn validate(&self, at: &str, errors: &mut Vec<ParameterError>) {
        let mut push = |field: &str, message: &str| {
            errors.push(ParameterError::new(format!("{at}.{field}"), message));
        };

        let mut check_name = |field: &str, name: &str| {
            if let Some(problem) = name_problem(name) {
                push(field, problem);
            }
        };
        check_name("type", &self.lid_type);
        if let Placement::Subcatchment(name) = &self.location {
            check_name("location.subcatchment", name);
        }
        match &self.drain_to {
            Some(DrainTarget::Subcatchment(name)) => check_name("drainTo.subcatchment", name),
            Some(DrainTarget::Node(name)) => check_name("drainTo.node", name),
            _ => {}
        }
        if let Some(file) = &self.rpt_file {
            check_name("rptFile", file);
        }
        if let Placement::Map(p) = &self.location {
            if !(p.x.is_finite() && p.y.is_finite()) {
                push("location.map", "coordinates must be finite");
            }
        }
        if let Some(DrainTarget::Map(p)) = &self.drain_to {
            if !(p.x.is_finite() && p.y.is_finite()) {
                push("drainTo.map", "coordinates must be finite");
            }
        }
        if self.number < 1 {
            push("number", "must be >= 1");
        }
        if !(self.area.is_finite() && self.area > 0.0) {
            push("area", "must be > 0");
        }
        if !(self.width.is_finite() && self.width >= 0.0) {
            push("width", "must be >= 0");
        }
        if !(0.0..=100.0).contains(&self.init_sat) {
            push("initSat", "must be in [0, 100]");
        }
        if !(0.0..=100.0).contains(&self.from_imp) {
            push("fromImp", "must be in [0, 100]");
        }
        if self.to_perv > 1 {
            push("toPerv", "must be 0 or 1");
        }
    }
}

/// Names end up as `.inp` fields, which cannot hold a double quote.
fn name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("must not be empty")
    } else if name.contains('"') {
        Some("must not contain '\"'")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "lids": [
            {
                "type": "RB1",
                "location": {"subcatchment": "S1"},
                "number": 2, "area": 50, "width": 0,
                "initSat": 0, "fromImp": 100, "toPerv": 0,
                "rptFile": "rb.txt"
            },
            {
                "type": "BC1",
                "location": {"map": {"x": 5.0, "y": 5.0}},
                "drainTo": {"node": "J1"},
                "number": 1, "area": 10.5, "width": 2,
                "initSat": 10, "fromImp": 25, "toPerv": 1
            }
        ]
    }"#;

    #[test]
    fn valid_document_parses() {
        let doc = ParameterDocument::from_json_str(VALID).expect("valid JSON");
        assert_eq!(doc.lids.len(), 2);
        assert_eq!(doc.lids[0].rpt_file.as_deref(), Some("rb.txt"));
        assert_eq!(doc.lids[1].location, Placement::Map(MapPoint { x: 5.0, y: 5.0 }));
        assert_eq!(doc.lids[1].drain_to, Some(DrainTarget::Node("J1".to_string())));
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn empty_document_has_no_lids() {
        let doc = ParameterDocument::from_json_str("{}").expect("valid JSON");
        assert!(doc.lids.is_empty());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = ParameterDocument::from_json_str(
            r#"{"lids": [], "bogus": true}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn location_must_name_a_placement_kind() {
        let err = ParameterDocument::from_json_str(
            r#"{"lids": [{"type": "RB1", "location": {"node": "J1"},
                "number": 1, "area": 1, "width": 0, "initSat": 0,
                "fromImp": 0, "toPerv": 0}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn validation_reports_every_offending_path() {
        let mut doc = ParameterDocument::from_json_str(VALID).expect("valid JSON");
        doc.lids[0].number = 0;
        doc.lids[1].area = -1.0;
        doc.lids[1].to_perv = 3;
        let errors = doc.validate();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["$.lids[0].number", "$.lids[1].area", "$.lids[1].toPerv"]
        );
    }

    #[test]
    fn validation_catches_percentages_out_of_range() {
        let mut doc = ParameterDocument::from_json_str(VALID).expect("valid JSON");
        doc.lids[0].init_sat = 120.0;
        doc.lids[0].from_imp = f64::NAN;
        let errors = doc.validate();
        assert!(errors.iter().any(|e| e.path == "$.lids[0].initSat"));
        assert!(errors.iter().any(|e| e.path == "$.lids[0].fromImp"));
    }

    #[test]
    fn double_quotes_in_names_are_rejected() {
        let mut doc = ParameterDocument::from_json_str(VALID).expect("valid JSON");
        doc.lids[0].rpt_file = Some("rep\"1.txt".to_string());
        doc.lids[0].location = Placement::Subcatchment("S\"1".to_string());
        doc.lids[1].drain_to = Some(DrainTarget::Node("J\"1".to_string()));
        let errors = doc.validate();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "$.lids[0].location.subcatchment",
                "$.lids[0].rptFile",
                "$.lids[1].drainTo.node",
            ]
        );
        assert!(errors.iter().all(|e| e.message.contains('"')));
    }

    #[test]
    fn error_display_includes_path() {
        let e = ParameterError::new("$.lids[3].width", "must be >= 0");
        assert_eq!(e.to_string(), "at `$.lids[3].width`: must be >= 0");
    }
}
