//! CSV export for monthly simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::MonthlyResult;

/// Column header for the monthly results CSV export.
const HEADER: &str = "month,outdoor_temp,indoor_temp,occupancy,occupancy_rate,\
                      sensible_load_kW,latent_load_kW,total_load_kW,shf,\
                      central_ahu_fan_kWh,central_chiller_kWh,central_total_kWh,\
                      local_fan_kWh,local_compressor_kWh,local_total_kWh,\
                      lighting_kWh,oa_equipment_kWh";

/// Exports monthly results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per month. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `results` - Complete monthly simulation results
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[MonthlyResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes monthly results as CSV to any writer.
///
/// # Arguments
///
/// * `results` - Complete monthly simulation results
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[MonthlyResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in results {
        wtr.write_record(&[
            r.month.to_string(),
            format!("{:.1}", r.outdoor_temp),
            format!("{:.1}", r.indoor_temp),
            r.occupancy.to_string(),
            format!("{:.2}", r.occupancy_rate),
            format!("{:.3}", r.sensible_load_kw),
            format!("{:.3}", r.latent_load_kw),
            format!("{:.3}", r.total_load_kw),
            format!("{:.4}", r.shf),
            format!("{:.2}", r.central_ahu_fan_kwh),
            format!("{:.2}", r.central_chiller_kwh),
            format!("{:.2}", r.central_total_kwh),
            format!("{:.2}", r.local_fan_kwh),
            format!("{:.2}", r.local_compressor_kwh),
            format!("{:.2}", r.local_total_kwh),
            format!("{:.2}", r.lighting_kwh),
            format!("{:.2}", r.oa_equipment_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
