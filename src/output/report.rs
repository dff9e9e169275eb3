use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::metrics::DataQuality;
use crate::ranking::{RankedArea, Summary};
use crate::scoring::Rating;

pub const DEFAULT_REPORT_NAME: &str = "rental_investment_report";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    /// Both CSV and JSON
    All,
    /// Console output only
    None,
}

/// One flat report row per ranked area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub rank: usize,
    pub zipcode: String,
    pub investment_score: f64,
    pub rating: Rating,
    pub population_score: f64,
    pub supply_score: f64,
    pub demand_score: f64,
    pub total_population: u64,
    pub renter_occupied: u64,
    pub owner_occupied: u64,
    pub rental_ratio: f64,
    pub total_listings: u64,
    pub average_rent: Option<f64>,
    pub median_income: Option<f64>,
    pub supply_demand_ratio: f64,
    pub rental_growth_yoy: Option<f64>,
    pub days_on_market: Option<f64>,
    pub data_quality: DataQuality,
}

impl From<&RankedArea> for ReportRow {
    fn from(area: &RankedArea) -> Self {
        Self {
            rank: area.rank,
            zipcode: area.zipcode.clone(),
            investment_score: area.result.investment_score,
            rating: area.result.rating,
            population_score: area.result.population_score,
            supply_score: area.result.supply_score,
            demand_score: area.result.demand_score,
            total_population: area.metrics.population,
            renter_occupied: area.metrics.renter_occupied,
            owner_occupied: area.metrics.owner_occupied,
            rental_ratio: round_to(area.renter_ratio, 3),
            total_listings: area.metrics.total_listings,
            average_rent: area.metrics.average_rent,
            median_income: area.metrics.median_income,
            supply_demand_ratio: round_to(area.supply_demand_ratio, 3),
            rental_growth_yoy: area.metrics.rent_growth_yoy,
            days_on_market: area.metrics.days_on_market,
            data_quality: area.data_quality,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    summary: Option<&'a Summary>,
    results: Vec<ReportRow>,
}

pub fn report_rows(ranked: &[RankedArea]) -> Vec<ReportRow> {
    ranked.iter().map(ReportRow::from).collect()
}

/// Write the ranking as CSV, atomically.
pub fn write_csv(path: &Path, ranked: &[RankedArea]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    {
        let mut writer = csv::Writer::from_writer(&mut file);
        for row in report_rows(ranked) {
            writer
                .serialize(&row)
                .with_context(|| format!("Failed to write CSV row for {}", row.zipcode))?;
        }
        writer.flush().context("Failed to flush CSV report")?;
    }

    file.commit()
        .with_context(|| format!("Failed to save CSV report to {}", path.display()))?;
    Ok(())
}

/// Write `{generated_at, summary, results}` as pretty JSON, atomically.
pub fn write_json(path: &Path, ranked: &[RankedArea], summary: Option<&Summary>) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now(),
        summary,
        results: report_rows(ranked),
    };

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, &report).context("Failed to serialize JSON report")?;
    file.write_all(b"\n").context("Failed to write JSON report")?;
    file.commit()
        .with_context(|| format!("Failed to save JSON report to {}", path.display()))?;
    Ok(())
}

/// Write the report files selected by `format` next to `base` (a path
/// without extension). Returns the paths written.
pub fn write_reports(
    base: &Path,
    format: OutputFormat,
    ranked: &[RankedArea],
    summary: Option<&Summary>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, OutputFormat::Csv | OutputFormat::All) {
        let path = base.with_extension("csv");
        write_csv(&path, ranked)?;
        written.push(path);
    }
    if matches!(format, OutputFormat::Json | OutputFormat::All) {
        let path = base.with_extension("json");
        write_json(&path, ranked, summary)?;
        written.push(path);
    }

    for path in &written {
        log::debug!("Report written to {}", path.display());
    }
    Ok(written)
}
