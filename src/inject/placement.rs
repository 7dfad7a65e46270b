//! Turns declared LID placements into subcatchment or node names.

use tracing::{debug, warn};

use super::geometry::GeometryIndex;
use super::lookup;
use crate::error::{InjectError, Result};
use crate::params::{DrainTarget, MapPoint, Placement};
use crate::swmm::Model;
use crate::swmm::schema::SectionSchema;

/// Where a LID's underdrain ends up after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolvedDrain {
    /// Drains to the host subcatchment's outlet.
    #[default]
    Outlet,
    Subcatchment(String),
    Node(String),
}

impl ResolvedDrain {
    /// Text of the `DrainTo` field of a `[LID_USAGE]` record.
    pub fn as_field(&self) -> &str {
        match self {
            Self::Outlet => "",
            Self::Subcatchment(name) | Self::Node(name) => name,
        }
    }
}

/// Resolves placements for one injection run.
///
/// The geometry index is built the first time a map coordinate needs
/// resolving and reused for the rest of the run.
#[derive(Debug)]
pub struct PlacementResolver<'s> {
    schema: &'s SectionSchema,
    geometry: Option<GeometryIndex>,
}

impl<'s> PlacementResolver<'s> {
    pub fn new(schema: &'s SectionSchema) -> Self {
        Self {
            schema,
            geometry: None,
        }
    }

    /// Whether the geometry index has been built.
    #[cfg(test)]
    fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    /// Resolves a LID location to an existing subcatchment name.
    ///
    /// # Errors
    ///
    /// `PointOutsideSubcatchments` if a map point lies in no polygon,
    /// `SubcatchmentNotFound` if a named subcatchment does not exist.
    pub fn resolve_location(&mut self, model: &Model, placement: &Placement) -> Result<String> {
        let name = match placement {
            Placement::Subcatchment(name) => name.clone(),
            Placement::Map(point) => self.subcatchment_at(model, *point)?,
        };
        self.require_subcatchment(model, name)
    }

    /// Resolves an optional drain target.
    ///
    /// # Errors
    ///
    /// As for [`resolve_location`](Self::resolve_location); node names are
    /// passed through unchecked.
    pub fn resolve_drain(&mut self, model: &Model, drain: Option<&DrainTarget>) -> Result<ResolvedDrain> {
        Ok(match drain {
            None => ResolvedDrain::Outlet,
            Some(DrainTarget::Node(node)) => ResolvedDrain::Node(node.clone()),
            Some(DrainTarget::Subcatchment(name)) => {
                ResolvedDrain::Subcatchment(self.require_subcatchment(model, name.clone())?)
            }
            Some(DrainTarget::Map(point)) => {
                let name = self.subcatchment_at(model, *point)?;
                ResolvedDrain::Subcatchment(self.require_subcatchment(model, name)?)
            }
        })
    }

    fn subcatchment_at(&mut self, model: &Model, point: MapPoint) -> Result<String> {
        let name = self
            .geometry(model)?
            .subcatchment_at(point.x, point.y)
            .map(str::to_string)
            .ok_or(InjectError::PointOutsideSubcatchments {
                x: point.x,
                y: point.y,
            })?;
        debug!(x = point.x, y = point.y, subcatchment = %name, "resolved map coordinates");
        Ok(name)
    }

    fn require_subcatchment(&self, model: &Model, name: String) -> Result<String> {
        if lookup::subcatchment_exists(model, &self.schema.subcatchments, &name) {
            Ok(name)
        } else {
            Err(InjectError::SubcatchmentNotFound { name })
        }
    }

    fn geometry(&mut self, model: &Model) -> Result<&GeometryIndex> {
        let index = match self.geometry.take() {
            Some(index) => index,
            None => {
                let index = GeometryIndex::from_model(model, &self.schema.polygons)?;
                if index.is_empty() {
                    warn!("model has no [POLYGONS] records; map coordinates cannot be resolved");
                } else {
                    debug!(polygons = index.len(), "built subcatchment geometry index");
                }
                index
            }
        };
        Ok(self.geometry.insert(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swmm::reader::parse;

    const MODEL: &str = "\
[SUBCATCHMENTS]
A RG1 J1 1 50 100 0.5 0
B RG1 J1 1 50 100 0.5 0

[POLYGONS]
A 0 0
A 10 0
A 10 10
A 0 10
B 10 0
B 20 0
B 20 10
B 10 10
";

    #[test]
    fn named_location_is_used_unchanged() {
        let model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);
        let name = resolver
            .resolve_location(&model, &Placement::Subcatchment("B".into()))
            .expect("B exists");
        assert_eq!(name, "B");
        assert!(!resolver.has_geometry(), "no coordinates, no index");
    }

    #[test]
    fn map_location_resolves_by_containment() {
        let model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);
        let name = resolver
            .resolve_location(&model, &Placement::Map(MapPoint { x: 12.0, y: 3.0 }))
            .expect("inside B");
        assert_eq!(name, "B");
        assert!(resolver.has_geometry());
    }

    #[test]
    fn point_outside_all_polygons_is_a_placement_error() {
        let model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);
        let err = resolver
            .resolve_location(&model, &Placement::Map(MapPoint { x: -5.0, y: 3.5 }))
            .expect_err("outside");
        assert!(err.to_string().contains("(-5, 3.5)"));
    }

    #[test]
    fn geometry_index_is_built_once_per_run() {
        let mut model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);
        let first = resolver
            .resolve_location(&model, &Placement::Map(MapPoint { x: 12.0, y: 3.0 }))
            .expect("inside B");
        assert_eq!(first, "B");

        // a rebuilt index would have no polygons left to match
        model.sections.retain(|s| s.name != crate::swmm::POLYGONS);
        let again = resolver
            .resolve_location(&model, &Placement::Map(MapPoint { x: 2.0, y: 3.0 }))
            .expect("cached index still knows A");
        assert_eq!(again, "A");
        let drain = resolver
            .resolve_drain(&model, Some(&DrainTarget::Map(MapPoint { x: 15.0, y: 5.0 })))
            .expect("cached index still knows B");
        assert_eq!(drain, ResolvedDrain::Subcatchment("B".into()));
    }

    #[test]
    fn drain_point_outside_all_polygons_is_a_placement_error() {
        let model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);
        let err = resolver
            .resolve_drain(&model, Some(&DrainTarget::Map(MapPoint { x: 40.0, y: 40.0 })))
            .expect_err("outside");
        assert!(matches!(err, InjectError::PointOutsideSubcatchments { x, y } if x == 40.0 && y == 40.0));
    }

    #[test]
    fn unknown_drain_subcatchment() {
        let model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);
        let err = resolver.resolve_drain(&model, Some(&DrainTarget::Subcatchment("Q".into())));
        assert!(matches!(err, Err(InjectError::SubcatchmentNotFound { ref name }) if name == "Q"));
        assert!(!resolver.has_geometry());
    }

    #[test]
    fn unknown_named_location() {
        let model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);
        let err = resolver.resolve_location(&model, &Placement::Subcatchment("Z".into()));
        assert!(matches!(err, Err(InjectError::SubcatchmentNotFound { ref name }) if name == "Z"));
    }

    #[test]
    fn drain_targets() {
        let model = parse(MODEL).expect("parse");
        let schema = SectionSchema::default();
        let mut resolver = PlacementResolver::new(&schema);

        let none = resolver.resolve_drain(&model, None).expect("none");
        assert_eq!(none.as_field(), "");

        let node = resolver
            .resolve_drain(&model, Some(&DrainTarget::Node("J9".into())))
            .expect("nodes are not checked");
        assert_eq!(node, ResolvedDrain::Node("J9".into()));

        let mapped = resolver
            .resolve_drain(&model, Some(&DrainTarget::Map(MapPoint { x: 1.0, y: 1.0 })))
            .expect("inside A");
        assert_eq!(mapped, ResolvedDrain::Subcatchment("A".into()));
    }
}
