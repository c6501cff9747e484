use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::DemographicRow;

/// Write the state data table as CSV with the dashboard's column headers.
pub fn write_csv<W: Write>(writer: W, rows: &[DemographicRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, row) in rows.iter().enumerate() {
        wtr.serialize(row)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    if rows.is_empty() {
        wtr.write_record(["Race", "Sex", "IPR", "Percent Uninsured", "Comparison to State"])
            .context("writing CSV header")?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// Export to a file, replacing any existing one.
pub fn export_csv(path: &Path, rows: &[DemographicRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, rows)?;
    log::info!("exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
