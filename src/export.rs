use crate::batch::BatchReport;
use crate::models::SymbolResult;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// `stock_OI_data_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: &str) -> String {
    format!("stock_OI_data_{}.csv", date)
}

/// Write ranked rows to `path`, one CSV record per symbol.
pub fn write_csv(path: &Path, rows: &[SymbolResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Persist a finished run into `output_dir`. Failures are logged and reported
/// as `None`; they never fail the run.
pub fn export_report(report: &BatchReport, output_dir: &Path) -> Option<PathBuf> {
    let path = output_dir.join(export_file_name(&report.date()));

    let written = std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))
        .and_then(|_| write_csv(&path, &report.data));

    match written {
        Ok(()) => {
            info!(path = %path.display(), rows = report.data.len(), "results exported");
            Some(path)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to export results");
            None
        }
    }
}
