//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use lid_inject::params::{LidEntry, MapPoint, Placement};
use lid_inject::swmm::Model;
use lid_inject::swmm::reader::parse;
use tempfile::TempDir;

/// Two-subcatchment SI model (hectares): `S1` is 2 ha at 80 % impervious,
/// `S2` is 1 ha at 50 %. `S1` covers the square (0,0)-(100,100), `S2` the
/// square (100,0)-(200,100).
pub const SI_MODEL: &str = "\
[TITLE]
;;Project Title/Notes
Two catchment test model

[OPTIONS]
;;Option             Value
FLOW_UNITS           LPS
INFILTRATION         HORTON

[SUBCATCHMENTS]
;;Name           Rain Gage        Outlet           Area     %Imperv  Width    %Slope   CurbLen  SnowPack
;;-------------- ---------------- ---------------- -------- -------- -------- -------- -------- ----------------
S1               RG1              J1               2        80       100      0.5      0
S2               RG1              J2               1        50       80       0.5      0

[LID_CONTROLS]
;;Name           Type/Layer Parameters
RB               RB
RB               STORAGE    1000       0.75       0.5        0
RB               DRAIN      1          0.5        0          6          0          0
BC1              BC
BC1              SURFACE    150        0.0        0.1        1.0        5

[JUNCTIONS]
;;Name           Elevation  MaxDepth
J1               10         2
J2               9          2

[POLYGONS]
;;Subcatchment   X-Coord            Y-Coord
S1               0                  0
S1               100                0
S1               100                100
S1               0                  100
S2               100                0
S2               200                0
S2               200                100
S2               100                100
";

/// Single-subcatchment US model (acres): `A1` is 1 acre at 25 % impervious.
pub const US_MODEL: &str = "\
[OPTIONS]
FLOW_UNITS CFS

[SUBCATCHMENTS]
A1 RG1 OUT1 1 25 200 1 0

[LID_CONTROLS]
BARREL RB
BARREL STORAGE 48 0.75 0.5 0
";

pub fn si_model() -> Model {
    parse(SI_MODEL).expect("SI fixture should parse")
}

pub fn us_model() -> Model {
    parse(US_MODEL).expect("US fixture should parse")
}

/// LID of `lid_type` in subcatchment `host` with `number` units of `area`.
pub fn lid_in(lid_type: &str, host: &str, number: u32, area: f64) -> LidEntry {
    LidEntry {
        lid_type: lid_type.to_string(),
        location: Placement::Subcatchment(host.to_string()),
        drain_to: None,
        number,
        area,
        width: 0.0,
        init_sat: 0.0,
        from_imp: 100.0,
        to_perv: 0,
        rpt_file: None,
    }
}

/// LID of `lid_type` placed at map coordinates `(x, y)`.
pub fn lid_at(lid_type: &str, x: f64, y: f64, number: u32, area: f64) -> LidEntry {
    LidEntry {
        location: Placement::Map(MapPoint { x, y }),
        ..lid_in(lid_type, "", number, area)
    }
}

/// Fresh scratch directory, removed when the returned guard drops.
pub fn scratch_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("lid-inject-{name}-"))
        .tempdir()
        .expect("TempDir should create test directory")
}
