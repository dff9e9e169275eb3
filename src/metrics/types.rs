use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::curves;

/// Raw metrics for one area (zip code).
///
/// Counts are already clamped to non-negative values and every float is
/// finite; see [`super::MetricsRecord`] for the ingestion boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaMetrics {
    pub population: u64,
    pub renter_occupied: u64,
    pub owner_occupied: u64,
    pub median_income: Option<f64>,
    pub total_listings: u64,
    pub days_on_market: Option<f64>,
    pub rent_growth_yoy: Option<f64>,      // fraction, 0.08 = 8%
    pub search_volume_index: Option<f64>,  // 0-100
    pub direct_demand_index: Option<f64>,  // 0-1
    pub average_rent: Option<f64>,         // display only
    pub data_source: Option<String>,       // display only
}

impl AreaMetrics {
    pub fn occupied_households(&self) -> u64 {
        self.renter_occupied.saturating_add(self.owner_occupied)
    }

    pub fn renter_ratio(&self) -> f64 {
        curves::renter_ratio(self.renter_occupied, self.owner_occupied)
    }

    pub fn listings_per_100(&self) -> f64 {
        curves::listings_per_100(self.total_listings, self.renter_occupied)
    }

    /// Listings per renter household, 0 when there are no renters.
    pub fn supply_demand_ratio(&self) -> f64 {
        if self.renter_occupied == 0 {
            0.0
        } else {
            self.total_listings as f64 / self.renter_occupied as f64
        }
    }

    /// Number of demand signals that were actually reported.
    pub fn demand_signal_count(&self) -> usize {
        [
            self.days_on_market,
            self.rent_growth_yoy,
            self.search_volume_index,
            self.direct_demand_index,
        ]
        .iter()
        .filter(|signal| signal.is_some())
        .count()
    }

    pub fn data_quality(&self) -> DataQuality {
        DataQuality::from_source(self.data_source.as_deref())
    }
}

/// Coarse provenance label shown next to each ranked area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Demo,
    High,
    Medium,
}

impl DataQuality {
    pub fn from_source(source: Option<&str>) -> Self {
        match source.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("demo_data") => DataQuality::Demo,
            Some("rentcast") | Some("zillow") | Some("realtor") => DataQuality::High,
            _ => DataQuality::Medium,
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataQuality::Demo => "demo",
            DataQuality::High => "high",
            DataQuality::Medium => "medium",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> AreaMetrics {
        AreaMetrics {
            population: 10_000,
            renter_occupied: 6_000,
            owner_occupied: 4_000,
            total_listings: 120,
            ..AreaMetrics::default()
        }
    }

    #[test]
    fn test_occupied_households() {
        assert_eq!(sample_metrics().occupied_households(), 10_000);
    }

    #[test]
    fn test_renter_ratio() {
        assert!((sample_metrics().renter_ratio() - 0.6).abs() < 1e-9);
        assert_eq!(AreaMetrics::default().renter_ratio(), 0.0);
    }

    #[test]
    fn test_supply_demand_ratio() {
        assert!((sample_metrics().supply_demand_ratio() - 0.02).abs() < 1e-9);
        assert_eq!(AreaMetrics::default().supply_demand_ratio(), 0.0);
    }

    #[test]
    fn test_listings_per_100_without_renters() {
        let metrics = AreaMetrics {
            total_listings: 40,
            ..AreaMetrics::default()
        };
        assert_eq!(metrics.listings_per_100(), f64::INFINITY);
    }

    #[test]
    fn test_demand_signal_count() {
        let mut metrics = sample_metrics();
        assert_eq!(metrics.demand_signal_count(), 0);
        metrics.days_on_market = Some(12.0);
        metrics.direct_demand_index = Some(0.4);
        assert_eq!(metrics.demand_signal_count(), 2);
    }

    #[test]
    fn test_data_quality_from_source() {
        assert_eq!(DataQuality::from_source(Some("demo_data")), DataQuality::Demo);
        assert_eq!(DataQuality::from_source(Some("RentCast")), DataQuality::High);
        assert_eq!(DataQuality::from_source(Some("zillow")), DataQuality::High);
        assert_eq!(DataQuality::from_source(Some("county-records")), DataQuality::Medium);
        assert_eq!(DataQuality::from_source(None), DataQuality::Medium);
    }

    #[test]
    fn test_data_quality_display() {
        assert_eq!(DataQuality::Demo.to_string(), "demo");
        assert_eq!(DataQuality::High.to_string(), "high");
    }
}
