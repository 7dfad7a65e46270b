//! CSV export of the injection report.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::inject::InjectionReport;
use crate::swmm::schema::format_number;

/// Column header of the injection report.
const HEADER: &str = "lid_id,lid_type,category,host_subcatchment,subcatchment,units,area,drain_to";

/// Writes the injection report to a CSV file at the given path.
///
/// One row per injected LID, in document order. Produces deterministic
/// output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_report_csv(report: &InjectionReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_report_csv(report, buf)
}

/// Writes the injection report as CSV to any writer.
///
/// `area` is the split footprint in the model's zone-area unit and is empty
/// for LIDs that were not split.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_report_csv(report: &InjectionReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for lid in &report.lids {
        let units = lid.units.to_string();
        let area = lid.area.map(format_number).unwrap_or_default();
        wtr.write_record([
            lid.lid_id.as_str(),
            lid.lid_type.as_str(),
            lid.category.code(),
            lid.host_subcatchment.as_str(),
            lid.subcatchment.as_str(),
            units.as_str(),
            area.as_str(),
            lid.drain_to.as_field(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
