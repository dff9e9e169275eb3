use rayon::prelude::*;
use std::cmp::Ordering;

use super::filter::RankFilters;
use crate::metrics::{AreaMetrics, DataQuality};
use crate::scoring::{calculate_score, ScoreResult, ScoreWeights};

/// One scored area together with the metrics it was scored from.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedArea {
    pub rank: usize, // 1-based, assigned after filtering
    pub zipcode: String,
    pub result: ScoreResult,
    pub metrics: AreaMetrics,
    pub renter_ratio: f64,
    pub supply_demand_ratio: f64,
    pub data_quality: DataQuality,
}

impl RankedArea {
    fn unranked(zipcode: &str, metrics: &AreaMetrics, weights: &ScoreWeights) -> Self {
        Self {
            rank: 0,
            zipcode: zipcode.to_string(),
            result: calculate_score(metrics, weights),
            metrics: metrics.clone(),
            renter_ratio: metrics.renter_ratio(),
            supply_demand_ratio: metrics.supply_demand_ratio(),
            data_quality: metrics.data_quality(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankOptions {
    pub filters: RankFilters,
    /// Keep only the best N areas after filtering
    pub top: Option<usize>,
    /// Score areas on the rayon thread pool
    pub parallel: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            filters: RankFilters::default(),
            top: None,
            parallel: true,
        }
    }
}

/// Score every area independently, preserving input order.
///
/// Each area depends only on its own metrics and the shared read-only
/// weights, so the parallel and sequential paths return identical results.
pub fn score_areas(
    areas: &[(String, AreaMetrics)],
    weights: &ScoreWeights,
    parallel: bool,
) -> Vec<RankedArea> {
    if parallel {
        areas
            .par_iter()
            .map(|(zipcode, metrics)| RankedArea::unranked(zipcode, metrics, weights))
            .collect()
    } else {
        areas
            .iter()
            .map(|(zipcode, metrics)| RankedArea::unranked(zipcode, metrics, weights))
            .collect()
    }
}

/// Investment score descending, then zip code ascending.
pub fn compare_ranked(a: &RankedArea, b: &RankedArea) -> Ordering {
    b.result
        .investment_score
        .partial_cmp(&a.result.investment_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.zipcode.cmp(&b.zipcode))
}

/// Score, filter, sort and truncate a batch of areas.
///
/// Areas with no usable data still get a (low) score; dropping them is up
/// to the filters.
pub fn rank_areas(
    areas: &[(String, AreaMetrics)],
    weights: &ScoreWeights,
    options: &RankOptions,
) -> Vec<RankedArea> {
    let scored = score_areas(areas, weights, options.parallel);
    let total = scored.len();

    let mut ranked: Vec<RankedArea> = scored
        .into_iter()
        .filter(|area| options.filters.passes(&area.metrics, &area.result))
        .collect();

    if options.filters.is_active() {
        log::info!("{} of {} areas meet the filter criteria", ranked.len(), total);
    }

    ranked.sort_by(compare_ranked);

    if let Some(top) = options.top {
        ranked.truncate(top);
    }

    for (i, area) in ranked.iter_mut().enumerate() {
        area.rank = i + 1;
    }

    ranked
}
