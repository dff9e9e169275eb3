use serde::{Deserialize, Serialize};

/// Component weights for the composite investment score.
///
/// The three weights are expected to sum to 1.0. The engine does not enforce
/// this; see [`crate::scoring::weight_sum_warning`] for the startup check.
///
/// Example YAML:
/// ```yaml
/// weights:
///   population: 0.30
///   supply: 0.35
///   demand: 0.35
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoreWeights {
    /// Weight of the population score (default: 0.30)
    #[serde(default = "default_population_weight")]
    pub population: f64,

    /// Weight of the supply tightness score (default: 0.35)
    #[serde(default = "default_supply_weight")]
    pub supply: f64,

    /// Weight of the demand score (default: 0.35)
    #[serde(default = "default_demand_weight")]
    pub demand: f64,
}

fn default_population_weight() -> f64 {
    0.30
}

fn default_supply_weight() -> f64 {
    0.35
}

fn default_demand_weight() -> f64 {
    0.35
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            population: default_population_weight(),
            supply: default_supply_weight(),
            demand: default_demand_weight(),
        }
    }
}

impl ScoreWeights {
    pub fn new(population: f64, supply: f64, demand: f64) -> Self {
        Self {
            population,
            supply,
            demand,
        }
    }

    /// One third each.
    pub fn equal() -> Self {
        let third = 1.0 / 3.0;
        Self::new(third, third, third)
    }

    pub fn total(&self) -> f64 {
        self.population + self.supply + self.demand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoreWeights::default();

        assert_eq!(weights.population, 0.30);
        assert_eq!(weights.supply, 0.35);
        assert_eq!(weights.demand, 0.35);
        assert!((weights.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_weights_sum_to_one() {
        let weights = ScoreWeights::equal();
        assert!((weights.total() - 1.0).abs() < 1e-9);
        assert_eq!(weights.population, weights.supply);
        assert_eq!(weights.supply, weights.demand);
    }

    #[test]
    fn test_weights_serde_roundtrip() {
        let weights = ScoreWeights::new(0.5, 0.25, 0.25);
        let yaml = serde_saphyr::to_string(&weights).unwrap();
        let parsed: ScoreWeights = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(weights, parsed);
    }

    #[test]
    fn test_partial_weights_parse() {
        let yaml = r#"
population: 0.5
"#;
        let weights: ScoreWeights = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(weights.population, 0.5);
        assert_eq!(weights.supply, 0.35);
        assert_eq!(weights.demand, 0.35);
    }

    #[test]
    fn test_empty_weights_parse_to_defaults() {
        let weights: ScoreWeights = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(weights, ScoreWeights::default());
    }

    #[test]
    fn test_unknown_weight_rejected() {
        let yaml = r#"
population: 0.3
growth: 0.2
"#;
        let parsed: Result<ScoreWeights, _> = serde_saphyr::from_str(yaml);
        assert!(parsed.is_err());
    }
}
