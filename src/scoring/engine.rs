use serde::{Deserialize, Serialize};
use std::fmt;

use super::components::{demand_score, population_score, supply_score, DemandBreakdown};
use super::config::ScoreWeights;
use super::curves::clamp_score;
use crate::metrics::AreaMetrics;

/// Decimal places kept in every reported score.
pub const SCORE_DECIMALS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

/// Lower bounds, highest first. Each band is closed below and open above.
const RATING_THRESHOLDS: [(f64, Rating); 5] = [
    (80.0, Rating::Excellent),
    (70.0, Rating::VeryGood),
    (60.0, Rating::Good),
    (50.0, Rating::Fair),
    (40.0, Rating::Poor),
];

impl Rating {
    pub fn from_score(score: f64) -> Self {
        RATING_THRESHOLDS
            .iter()
            .find(|(lower, _)| score >= *lower)
            .map(|(_, rating)| *rating)
            .unwrap_or(Rating::VeryPoor)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::VeryGood => "Very Good",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
            Rating::VeryPoor => "Very Poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scores for one area. All values are in 0-100 and rounded to
/// [`SCORE_DECIMALS`] places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub population_score: f64,
    pub supply_score: f64,
    pub demand_score: f64,
    pub investment_score: f64,
    pub rating: Rating,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Population", "Supply", "Demand"
    pub description: String, // e.g. "10000 people, 60.0% renters"
    pub score: f64,          // Component score before weighting
    pub weight: f64,
    pub weighted: f64,       // score * weight
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub result: ScoreResult,
    pub factors: Vec<FactorContribution>,
    pub demand: DemandBreakdown,
}

pub fn round_score(value: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (value * factor).round() / factor
}

/// Weighted sum of the component scores, clamped and rounded.
///
/// Weights are used as given; all-zero weights produce 0.
pub fn composite_score(population: f64, supply: f64, demand: f64, weights: &ScoreWeights) -> f64 {
    let weighted =
        population * weights.population + supply * weights.supply + demand * weights.demand;
    round_score(clamp_score(weighted))
}

pub fn calculate_score(metrics: &AreaMetrics, weights: &ScoreWeights) -> ScoreResult {
    let population = population_score(metrics);
    let supply = supply_score(metrics);
    let demand = demand_score(metrics);

    let investment_score = composite_score(population, supply, demand, weights);

    ScoreResult {
        population_score: round_score(population),
        supply_score: round_score(supply),
        demand_score: round_score(demand),
        investment_score,
        rating: Rating::from_score(investment_score),
    }
}

/// Same result as [`calculate_score`], with a per-component explanation.
pub fn explain_score(metrics: &AreaMetrics, weights: &ScoreWeights) -> ScoreBreakdown {
    let result = calculate_score(metrics, weights);
    let demand = DemandBreakdown::from_metrics(metrics);

    let listings = metrics.listings_per_100();
    let supply_description = if listings.is_finite() {
        format!(
            "{} listings, {:.2} per 100 renter households",
            metrics.total_listings, listings
        )
    } else {
        format!("{} listings, no renter households", metrics.total_listings)
    };

    let factors = vec![
        FactorContribution {
            label: "Population".to_string(),
            description: format!(
                "{} people, {:.1}% renters",
                metrics.population,
                metrics.renter_ratio() * 100.0
            ),
            score: result.population_score,
            weight: weights.population,
            weighted: result.population_score * weights.population,
        },
        FactorContribution {
            label: "Supply".to_string(),
            description: supply_description,
            score: result.supply_score,
            weight: weights.supply,
            weighted: result.supply_score * weights.supply,
        },
        FactorContribution {
            label: "Demand".to_string(),
            description: format!(
                "{} of 4 signals reported, missing ones count as neutral",
                metrics.demand_signal_count()
            ),
            score: result.demand_score,
            weight: weights.demand,
            weighted: result.demand_score * weights.demand,
        },
    ];

    ScoreBreakdown {
        result,
        factors,
        demand,
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
            total_listings: 75, // 1.25 per 100 renters -> 85
            ..AreaMetrics::default()
        }
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::from_score(100.0), Rating::Excellent);
        assert_eq!(Rating::from_score(80.0), Rating::Excellent);
        assert_eq!(Rating::from_score(79.99), Rating::VeryGood);
        assert_eq!(Rating::from_score(70.0), Rating::VeryGood);
        assert_eq!(Rating::from_score(69.99), Rating::Good);
        assert_eq!(Rating::from_score(60.0), Rating::Good);
        assert_eq!(Rating::from_score(59.99), Rating::Fair);
        assert_eq!(Rating::from_score(50.0), Rating::Fair);
        assert_eq!(Rating::from_score(49.99), Rating::Poor);
        assert_eq!(Rating::from_score(40.0), Rating::Poor);
        assert_eq!(Rating::from_score(39.99), Rating::VeryPoor);
        assert_eq!(Rating::from_score(0.0), Rating::VeryPoor);
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(Rating::VeryGood.to_string(), "Very Good");
        assert_eq!(Rating::Excellent.label(), "Excellent");
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(61.0167), 61.02);
        assert_eq!(round_score(47.5555), 47.56);
        assert_eq!(round_score(85.0), 85.0);
    }

    #[test]
    fn test_composite_documented_example() {
        let weights = ScoreWeights::new(0.30, 0.35, 0.35);
        // 14.268 + 29.75 + 17.5
        let score = composite_score(47.56, 85.0, 50.0, &weights);
        assert_eq!(score, 61.52);
        assert_eq!(Rating::from_score(score), Rating::Good);
    }

    #[test]
    fn test_composite_equal_weights_preserve_score() {
        let weights = ScoreWeights::equal();
        assert_eq!(composite_score(64.5, 64.5, 64.5, &weights), 64.5);
    }

    #[test]
    fn test_composite_zero_weights() {
        let weights = ScoreWeights::new(0.0, 0.0, 0.0);
        assert_eq!(composite_score(90.0, 90.0, 90.0, &weights), 0.0);
    }

    #[test]
    fn test_composite_clamps_oversized_weights() {
        let weights = ScoreWeights::new(2.0, 2.0, 2.0);
        assert_eq!(composite_score(90.0, 90.0, 90.0, &weights), 100.0);
    }

    #[test]
    fn test_composite_negative_weights_floor_at_zero() {
        let weights = ScoreWeights::new(-1.0, 0.0, 0.0);
        assert_eq!(composite_score(90.0, 90.0, 90.0, &weights), 0.0);
    }

    #[test]
    fn test_composite_nan_weight_is_zero() {
        let weights = ScoreWeights::new(f64::NAN, 0.5, 0.5);
        assert_eq!(composite_score(90.0, 90.0, 90.0, &weights), 0.0);
    }

    #[test]
    fn test_calculate_score_full_flow() {
        let result = calculate_score(&sample_metrics(), &ScoreWeights::default());

        assert_eq!(result.population_score, 47.56);
        assert_eq!(result.supply_score, 85.0);
        assert_eq!(result.demand_score, 50.0);
        assert_eq!(result.investment_score, 61.52);
        assert_eq!(result.rating, Rating::Good);
    }

    #[test]
    fn test_calculate_score_is_deterministic() {
        let metrics = sample_metrics();
        let weights = ScoreWeights::default();
        assert_eq!(
            calculate_score(&metrics, &weights),
            calculate_score(&metrics, &weights)
        );
    }

    #[test]
    fn test_empty_area_still_scores() {
        let result = calculate_score(&AreaMetrics::default(), &ScoreWeights::default());

        // population 0, supply worst tier, demand neutral
        assert_eq!(result.population_score, 0.0);
        assert_eq!(result.supply_score, 0.0);
        assert_eq!(result.demand_score, 50.0);
        assert_eq!(result.investment_score, 17.5);
        assert_eq!(result.rating, Rating::VeryPoor);
    }

    #[test]
    fn test_explain_score_matches_calculate() {
        let metrics = sample_metrics();
        let weights = ScoreWeights::default();
        let breakdown = explain_score(&metrics, &weights);

        assert_eq!(breakdown.result, calculate_score(&metrics, &weights));
        assert_eq!(breakdown.factors.len(), 3);
        assert_eq!(breakdown.factors[0].label, "Population");
        assert!(breakdown.factors[1].description.contains("1.25 per 100"));
        assert!(breakdown.factors[2].description.starts_with("0 of 4"));
        assert_eq!(breakdown.demand.rent_growth, 50.0);
    }

    #[test]
    fn test_explain_score_without_renters() {
        let metrics = AreaMetrics {
            total_listings: 12,
            ..AreaMetrics::default()
        };
        let breakdown = explain_score(&metrics, &ScoreWeights::default());
        assert!(breakdown.factors[1]
            .description
            .contains("no renter households"));
    }
}
