use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::normalize::GeoResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSV row. Empty cells stand in for missing values.
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    query: &'a str,
    query_type: &'a str,
    success: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<&'a str>,
    building: Option<&'a str>,
    road: Option<&'a str>,
    postal_code: Option<&'a str>,
    error: Option<&'a str>,
    timestamp: String,
}

impl<'a> From<&'a GeoResult> for ResultRow<'a> {
    fn from(r: &'a GeoResult) -> Self {
        Self {
            query: &r.query,
            query_type: r.query_type.as_str(),
            success: r.success,
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address.as_deref(),
            building: r.building.as_deref(),
            road: r.road.as_deref(),
            postal_code: r.postal_code.as_deref(),
            error: r.error.as_deref(),
            timestamp: r.timestamp.to_rfc3339(),
        }
    }
}

/// Write results as CSV with a header row, one row per result in order
pub fn write_results_csv<W: Write>(results: &[GeoResult], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(ResultRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn default_export_filename(now: DateTime<Utc>) -> String {
    format!(
        "singapore_geocoding_results_{}.csv",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Export results to `path`, or to a timestamped file in the working directory
pub fn export_results(results: &[GeoResult], path: Option<&Path>) -> Result<PathBuf, ExportError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_export_filename(Utc::now())),
    };

    let file = File::create(&path)?;
    write_results_csv(results, file)?;

    info!("Exported {} results to {}", results.len(), path.display());
    Ok(path)
}
