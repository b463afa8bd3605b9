//! CSV export for hourly game results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourResult;

/// Column header for CSV telemetry export, one row per (hour, player).
const HEADER: &str = "hour,player_id,strategy,price,demand_before_kwh,demand_after_kwh,\
                      cost_savings,solar_kwh,wind_kwh,renewable_kwh,total_demand_kwh,\
                      battery_soc_kwh";

/// Exports hourly results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per player per hour.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(hours: &[HourResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(hours, buf)
}

/// Writes hourly results as CSV to any writer.
///
/// Grid columns repeat on every player row of the same hour.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(hours: &[HourResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for h in hours {
        for p in &h.players {
            wtr.write_record(&[
                h.hour.to_string(),
                p.player_id.to_string(),
                p.strategy.to_string(),
                format!("{:.4}", p.price),
                format!("{:.4}", p.demand_before_kwh),
                format!("{:.4}", p.demand_after_kwh),
                format!("{:.4}", p.cost_savings),
                format!("{:.4}", h.solar_kwh),
                format!("{:.4}", h.wind_kwh),
                format!("{:.4}", h.renewable_kwh),
                format!("{:.4}", h.total_demand_kwh),
                format!("{:.4}", h.battery_soc_kwh),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
