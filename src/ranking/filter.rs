use serde::{Deserialize, Serialize};

use crate::metrics::AreaMetrics;
use crate::scoring::ScoreResult;

/// Threshold filters applied after scoring. Unset thresholds are inactive.
///
/// Example YAML:
/// ```yaml
/// filters:
///   min_population: 10000
///   max_listings: 500
///   min_score: 55
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RankFilters {
    /// Keep areas with at least this many residents
    #[serde(default)]
    pub min_population: Option<u64>,

    /// Keep areas with at most this many rental listings
    #[serde(default)]
    pub max_listings: Option<u64>,

    /// Keep areas whose investment score is at least this value
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl RankFilters {
    pub fn is_active(&self) -> bool {
        self.min_population.is_some() || self.max_listings.is_some() || self.min_score.is_some()
    }

    /// True when the area passes every active threshold.
    pub fn passes(&self, metrics: &AreaMetrics, result: &ScoreResult) -> bool {
        if let Some(min) = self.min_population {
            if metrics.population < min {
                return false;
            }
        }
        if let Some(max) = self.max_listings {
            if metrics.total_listings > max {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if result.investment_score < min {
                return false;
            }
        }
        true
    }

    /// Layer `overrides` on top of these filters; set values win.
    pub fn merged(&self, overrides: &RankFilters) -> RankFilters {
        RankFilters {
            min_population: overrides.min_population.or(self.min_population),
            max_listings: overrides.max_listings.or(self.max_listings),
            min_score: overrides.min_score.or(self.min_score),
        }
    }
}
