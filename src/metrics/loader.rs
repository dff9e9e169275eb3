use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use super::record::{MetricsError, MetricsRecord};
use super::types::AreaMetrics;

/// Areas parsed from an input file, plus the rows that failed validation.
#[derive(Debug, Default)]
pub struct LoadedMetrics {
    pub areas: Vec<(String, AreaMetrics)>,
    pub rejected: Vec<MetricsError>,
}

/// Load area metrics from a `.json` (array of records) or `.csv` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported
/// extension, or is not valid JSON/CSV. Rows that parse but fail the
/// ingestion rules are reported in [`LoadedMetrics::rejected`] instead.
pub fn load_metrics_file(path: &Path) -> Result<LoadedMetrics> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read metrics file {}", path.display()))?;
            parse_metrics_json(&content)
                .with_context(|| format!("Failed to parse metrics in {}", path.display()))
        }
        Some("csv") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open metrics file {}", path.display()))?;
            parse_metrics_csv(file)
                .with_context(|| format!("Failed to parse metrics in {}", path.display()))
        }
        _ => bail!(
            "Unsupported metrics file {}: expected a .json or .csv extension",
            path.display()
        ),
    }
}

/// Parse a JSON array of records. A row that is not a valid record is
/// rejected on its own; only a document that is not an array is an error.
pub fn parse_metrics_json(content: &str) -> Result<LoadedMetrics> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(content).context("Expected a JSON array of area records")?;

    let rows = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value::<MetricsRecord>(value).map_err(|e| MetricsError::Malformed {
                row: i + 1,
                reason: e.to_string(),
            })
        })
        .collect();
    Ok(collect_records(rows))
}

pub fn parse_metrics_csv<R: Read>(reader: R) -> Result<LoadedMetrics> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .headers()
        .context("Failed to read CSV header")?;

    let rows = csv_reader
        .deserialize::<MetricsRecord>()
        .enumerate()
        .map(|(i, row)| {
            // Header is line 1
            row.map_err(|e| MetricsError::Malformed {
                row: i + 2,
                reason: e.to_string(),
            })
        })
        .collect();
    Ok(collect_records(rows))
}

/// Convert raw rows, keeping the first occurrence of each zip code.
fn collect_records(rows: Vec<Result<MetricsRecord, MetricsError>>) -> LoadedMetrics {
    let mut loaded = LoadedMetrics::default();
    let mut seen = HashSet::new();

    for row in rows {
        match row.and_then(MetricsRecord::into_area) {
            Ok((zipcode, metrics)) => {
                if seen.insert(zipcode.clone()) {
                    loaded.areas.push((zipcode, metrics));
                } else {
                    log::warn!("Duplicate zip code {} in input; keeping the first row", zipcode);
                }
            }
            Err(e) => {
                log::warn!("Skipping input row: {}", e);
                loaded.rejected.push(e);
            }
        }
    }

    log::debug!(
        "Loaded {} areas ({} rows rejected)",
        loaded.areas.len(),
        loaded.rejected.len()
    );
    loaded
}
