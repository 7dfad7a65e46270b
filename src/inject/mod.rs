//! Injection of LID usages into a SWMM model.
//!
//! [`inject`] walks the parameter document in order. For each LID it
//! resolves the location and drain target, looks up the control's
//! structural category, allocates an instance id, splits the host
//! subcatchment for land-occupying categories, and appends a
//! `[LID_USAGE]` record.

use tracing::{debug, info, warn};

pub mod geometry;
pub mod ids;
pub mod lookup;
pub mod placement;
pub mod split;

use self::ids::IdAllocator;
use self::placement::{PlacementResolver, ResolvedDrain};
use crate::error::{InjectError, Result};
use crate::params::{LidEntry, ParameterDocument};
use crate::swmm::schema::{LidCategory, SectionSchema, format_number};
use crate::swmm::{LID_USAGE, Line, Model, OPTIONS, SUBCATCHMENTS};
use crate::units::UnitSystem;

/// Tool name written into comments of generated records.
pub const GENERATOR: &str = "lid-inject";

/// What happened to one LID of the parameter document.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectedLid {
    pub lid_id: String,
    pub lid_type: String,
    pub category: LidCategory,
    /// Subcatchment the LID was placed in.
    pub host_subcatchment: String,
    /// Subcatchment named by the `[LID_USAGE]` record: the generated child
    /// for land-occupying LIDs, otherwise the host.
    pub subcatchment: String,
    pub units: u32,
    /// Total footprint in the model's zone-area unit, for split LIDs.
    pub area: Option<f64>,
    pub drain_to: ResolvedDrain,
}

/// Per-LID outcome of an injection run, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjectionReport {
    pub unit_system: Option<UnitSystem>,
    pub lids: Vec<InjectedLid>,
}

/// Validates `params` and injects every LID into `model`.
///
/// # Errors
///
/// `InvalidParameters` before any change to `model`; any other
/// [`InjectError`] leaves `model` partially modified.
pub fn inject(params: &ParameterDocument, model: &mut Model, schema: &SectionSchema) -> Result<InjectionReport> {
    let errors = params.validate();
    if !errors.is_empty() {
        return Err(InjectError::InvalidParameters(errors));
    }
    Injector::new(schema).run(params, model)
}

/// Unit system of `model`, derived from its `FLOW_UNITS` option.
///
/// # Errors
///
/// `UnknownFlowUnits` for a value SWMM does not define.
pub fn unit_system(model: &Model, schema: &SectionSchema) -> Result<UnitSystem> {
    let flow_units = model
        .section(OPTIONS)
        .and_then(|s| schema.options.lookup(&s.lines, "FLOW_UNITS"))
        .unwrap_or("CFS");
    let tag = match flow_units.to_ascii_uppercase().as_str() {
        "CFS" | "GPM" | "MGD" => "US",
        "CMS" | "LPS" | "MLD" => "SI",
        _ => return Err(InjectError::UnknownFlowUnits(flow_units.to_string())),
    };
    tag.parse()
}

/// State of one injection run: id counters, the lazily built geometry
/// index, and the model's unit system once known.
#[derive(Debug)]
pub struct Injector<'s> {
    schema: &'s SectionSchema,
    ids: IdAllocator,
    placement: PlacementResolver<'s>,
    units: Option<UnitSystem>,
}

impl<'s> Injector<'s> {
    pub fn new(schema: &'s SectionSchema) -> Self {
        Self {
            schema,
            ids: IdAllocator::new(),
            placement: PlacementResolver::new(schema),
            units: None,
        }
    }

    /// Injects every LID of `params` without validating the document first.
    ///
    /// # Errors
    ///
    /// The first [`InjectError`] raised by any LID.
    pub fn run(mut self, params: &ParameterDocument, model: &mut Model) -> Result<InjectionReport> {
        let mut lids = Vec::with_capacity(params.lids.len());
        for lid in &params.lids {
            lids.push(self.inject_one(lid, model)?);
        }
        info!(count = lids.len(), "injected LIDs");
        Ok(InjectionReport {
            unit_system: self.units,
            lids,
        })
    }

    fn inject_one(&mut self, lid: &LidEntry, model: &mut Model) -> Result<InjectedLid> {
        let host = self.placement.resolve_location(model, &lid.location)?;
        let drain_to = self.placement.resolve_drain(model, lid.drain_to.as_ref())?;

        let control = lookup::lid_control(model, &self.schema.lid_controls, &lid.lid_type)?;
        let lid_id = self.ids.next_instance_id(&lid.lid_type);
        debug!(%lid_id, subcatchment = %host, category = control.category.code(), "placing LID");

        let mut usage_subcatchment = host.clone();
        let mut area = None;
        if control.category.occupies_land() {
            let (child, footprint) = self.split_host(lid, &lid_id, &host, model)?;
            usage_subcatchment = child;
            area = Some(footprint);
        } else {
            warn!(
                %lid_id,
                category = control.category.code(),
                "LID category is not directly supported; manual adjustments to other objects, \
                 such as subcatchments, may be necessary"
            );
        }

        model
            .section_or_insert(LID_USAGE)
            .lines
            .push(usage_line(lid, &usage_subcatchment, &drain_to));
        info!(%lid_id, subcatchment = %usage_subcatchment, units = lid.number, "injected LID");

        Ok(InjectedLid {
            lid_id,
            lid_type: lid.lid_type.clone(),
            category: control.category,
            host_subcatchment: host,
            subcatchment: usage_subcatchment,
            units: lid.number,
            area,
            drain_to,
        })
    }

    /// Moves the LID footprint from `host` into a new child subcatchment.
    ///
    /// Returns the child's name and area (zone-area units).
    fn split_host(&mut self, lid: &LidEntry, lid_id: &str, host: &str, model: &mut Model) -> Result<(String, f64)> {
        let units = self.unit_system(model)?;
        let schema = self.schema;
        let fields = &schema.subcatchments;

        let host_index = lookup::subcatchment_index(model, fields, host).ok_or_else(|| {
            InjectError::SubcatchmentNotFound {
                name: host.to_string(),
            }
        })?;
        let host_line = model
            .section(SUBCATCHMENTS)
            .map(|s| s.lines[host_index].clone())
            .ok_or_else(|| InjectError::SubcatchmentNotFound {
                name: host.to_string(),
            })?;
        let host_record = fields.read(&host_line)?;

        let split = split::split_subcatchment(&host_record, lid.number, lid.area, units, lid_id)?;
        let child_name = ids::child_subcatchment_name(model, fields, host, lid_id);
        let child_record = split.child_record(child_name.clone(), units);
        let reduced = split.host_record(&host_record, units);

        let mut child_line = host_line;
        fields.write(&child_record, &mut child_line);
        child_line.comment = Some(format!(
            "{} LID units. (Added by {GENERATOR}.)",
            lid.number
        ));

        let section = model.section_or_insert(SUBCATCHMENTS);
        fields.write(&reduced, &mut section.lines[host_index]);
        // keep the child with its siblings, ahead of trailing blank lines
        let after_last_record = section
            .lines
            .iter()
            .rposition(Line::is_data)
            .map_or(section.lines.len(), |i| i + 1);
        section.lines.insert(after_last_record, child_line);

        info!(
            %lid_id,
            host = %host,
            child = %child_name,
            child_area = child_record.area,
            host_area = reduced.area,
            host_imperv_pct = reduced.imperv_pct,
            "split subcatchment"
        );
        Ok((child_name, child_record.area))
    }

    fn unit_system(&mut self, model: &Model) -> Result<UnitSystem> {
        if let Some(units) = self.units {
            return Ok(units);
        }
        let units = unit_system(model, self.schema)?;
        debug!(%units, "model unit system");
        self.units = Some(units);
        Ok(units)
    }
}

fn usage_line(lid: &LidEntry, subcatchment: &str, drain_to: &ResolvedDrain) -> Line {
    Line::new(vec![
        subcatchment.to_string(),
        lid.lid_type.clone(),
        lid.number.to_string(),
        format_number(lid.area),
        format_number(lid.width),
        format_number(lid.init_sat),
        format_number(lid.from_imp),
        lid.to_perv.to_string(),
        lid.rpt_file.clone().unwrap_or_default(),
        drain_to.as_field().to_string(),
    ])
}
