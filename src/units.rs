//! Dimension-checked area and fraction quantities.
//!
//! Areas are stored in square metres using exact conversion factors, so a
//! value can move between the US and SI unit systems without drift beyond
//! ordinary `f64` rounding. Raw magnitudes only leave this module through
//! [`Area::to`] and [`Fraction::percent`].

use std::fmt;
use std::ops::{Div, Mul, Sub};
use std::str::FromStr;

use crate::error::InjectError;

/// Units an [`Area`] can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaUnit {
    SquareFoot,
    SquareMetre,
    Acre,
    Hectare,
}

impl AreaUnit {
    /// Size of one unit in square metres (exact by definition).
    pub const fn square_metres(self) -> f64 {
        match self {
            Self::SquareFoot => 0.092_903_04,
            Self::SquareMetre => 1.0,
            Self::Acre => 4_046.856_422_4,
            Self::Hectare => 10_000.0,
        }
    }
}

/// A physical area.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Area {
    square_metres: f64,
}

impl Area {
    pub const ZERO: Self = Self { square_metres: 0.0 };

    /// Creates an area of `magnitude` in `unit`.
    pub fn new(magnitude: f64, unit: AreaUnit) -> Self {
        Self {
            square_metres: magnitude * unit.square_metres(),
        }
    }

    /// Magnitude of this area expressed in `unit`.
    pub fn to(self, unit: AreaUnit) -> f64 {
        self.square_metres / unit.square_metres()
    }
}

impl Sub for Area {
    type Output = Area;

    fn sub(self, rhs: Area) -> Area {
        Area {
            square_metres: self.square_metres - rhs.square_metres,
        }
    }
}

impl Mul<Area> for f64 {
    type Output = Area;

    fn mul(self, rhs: Area) -> Area {
        Area {
            square_metres: self * rhs.square_metres,
        }
    }
}

impl Mul<Area> for Fraction {
    type Output = Area;

    fn mul(self, rhs: Area) -> Area {
        self.0 * rhs
    }
}

impl Div for Area {
    type Output = Fraction;

    fn div(self, rhs: Area) -> Fraction {
        Fraction(self.square_metres / rhs.square_metres)
    }
}

/// A dimensionless ratio, e.g. the impervious share of a subcatchment.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Fraction(f64);

impl Fraction {
    pub const ZERO: Self = Self(0.0);

    pub fn from_percent(percent: f64) -> Self {
        Self(percent / 100.0)
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }

    pub fn ratio(self) -> f64 {
        self.0
    }
}

/// The two unit systems a SWMM model can be authored in.
///
/// Each system pairs the unit LID footprints are declared in with the unit
/// subcatchment areas are stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Us,
    Si,
}

impl UnitSystem {
    /// Unit of the per-unit `area` field of a LID usage.
    pub const fn lid_area_unit(self) -> AreaUnit {
        match self {
            Self::Us => AreaUnit::SquareFoot,
            Self::Si => AreaUnit::SquareMetre,
        }
    }

    /// Unit of the `Area` field of a subcatchment.
    pub const fn zone_area_unit(self) -> AreaUnit {
        match self {
            Self::Us => AreaUnit::Acre,
            Self::Si => AreaUnit::Hectare,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Si => "SI",
        }
    }
}

impl FromStr for UnitSystem {
    type Err = InjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "US" => Ok(Self::Us),
            "SI" => Ok(Self::Si),
            _ => Err(InjectError::UnknownUnitSystem(s.to_string())),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
