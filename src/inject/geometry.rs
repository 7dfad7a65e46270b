//! Subcatchment polygons built from `[POLYGONS]` vertex records.

use std::collections::HashMap;

use geo::{Contains, LineString, Point, Polygon};

use crate::error::Result;
use crate::swmm::schema::PolygonFields;
use crate::swmm::{Model, POLYGONS};

/// Boundary polygon of every subcatchment that has vertex records.
///
/// Vertices are taken in file order; the ring is closed implicitly.
#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    polygons: Vec<(String, Polygon<f64>)>,
}

impl GeometryIndex {
    /// Builds the index from the model's `[POLYGONS]` section.
    ///
    /// A model without that section yields an empty index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if a vertex coordinate is not a number.
    pub fn from_model(model: &Model, fields: &PolygonFields) -> Result<Self> {
        let Some(section) = model.section(POLYGONS) else {
            return Ok(Self::default());
        };

        let mut order: Vec<String> = Vec::new();
        let mut rings: HashMap<String, Vec<(f64, f64)>> = HashMap::new();
        for line in section.data_lines() {
            let vertex = fields.read(line)?;
            let ring = rings.entry(vertex.subcatchment.clone()).or_insert_with(|| {
                order.push(vertex.subcatchment.clone());
                Vec::new()
            });
            ring.push((vertex.x, vertex.y));
        }

        let polygons = order
            .into_iter()
            .filter_map(|name| {
                let ring = rings.remove(&name)?;
                Some((name, Polygon::new(LineString::from(ring), vec![])))
            })
            .collect();

        Ok(Self { polygons })
    }

    /// Name of the first subcatchment whose polygon strictly contains
    /// `(x, y)`. Points on a boundary are not contained.
    pub fn subcatchment_at(&self, x: f64, y: f64) -> Option<&str> {
        let point = Point::new(x, y);
        self.polygons
            .iter()
            .find(|(_, polygon)| polygon.contains(&point))
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}
