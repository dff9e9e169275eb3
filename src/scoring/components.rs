use serde::Serialize;

use super::curves::{
    clamp_score, days_on_market_curve, direct_demand_score, population_curve, rent_growth_curve,
    renter_bonus, search_volume_score, supply_curve,
};
use crate::metrics::AreaMetrics;

/// Population curve plus the renter-ratio bonus, clamped to 0-100.
pub fn population_score(metrics: &AreaMetrics) -> f64 {
    let base = population_curve(metrics.population as f64);
    clamp_score(base + renter_bonus(metrics.renter_ratio()))
}

/// Supply tightness from listings per 100 renter households.
pub fn supply_score(metrics: &AreaMetrics) -> f64 {
    supply_curve(metrics.listings_per_100())
}

/// The four demand sub-scores, each already defaulted to neutral when the
/// underlying signal is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandBreakdown {
    pub days_on_market: f64,
    pub rent_growth: f64,
    pub search_volume: f64,
    pub direct_demand: f64,
}

impl DemandBreakdown {
    pub fn from_metrics(metrics: &AreaMetrics) -> Self {
        Self {
            days_on_market: days_on_market_curve(metrics.days_on_market),
            rent_growth: rent_growth_curve(metrics.rent_growth_yoy),
            search_volume: search_volume_score(metrics.search_volume_index),
            direct_demand: direct_demand_score(metrics.direct_demand_index),
        }
    }

    pub fn mean(&self) -> f64 {
        let sum = self.days_on_market + self.rent_growth + self.search_volume + self.direct_demand;
        clamp_score(sum / 4.0)
    }
}

/// Mean of the four demand indicators.
pub fn demand_score(metrics: &AreaMetrics) -> f64 {
    DemandBreakdown::from_metrics(metrics).mean()
}
