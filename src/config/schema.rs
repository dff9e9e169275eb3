use serde::{Deserialize, Serialize};

use crate::output::{OutputFormat, DEFAULT_REPORT_NAME};
use crate::ranking::RankFilters;
use crate::scoring::{validate_weights, ScoreWeights};

/// Number of areas kept after ranking unless overridden
pub const DEFAULT_TOP: usize = 50;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub weights: ScoreWeights,

    #[serde(default)]
    pub filters: RankFilters,

    /// Areas kept after ranking, for the console and the reports (default: 50)
    #[serde(default = "default_top")]
    pub top: usize,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_top() -> usize {
    DEFAULT_TOP
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            filters: RankFilters::default(),
            top: DEFAULT_TOP,
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate the whole config at startup.
    /// Returns all validation errors at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = match validate_weights(&self.weights) {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };

        if let Some(min_score) = self.filters.min_score {
            if !min_score.is_finite() {
                errors.push("filters.min_score: must be a finite number".to_string());
            }
        }
        if self.top == 0 {
            errors.push("top: must be at least 1".to_string());
        }
        if self.output.path.trim().is_empty() {
            errors.push("output.path: must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Report path without extension
    #[serde(default = "default_report_path")]
    pub path: String,
}

fn default_report_path() -> String {
    DEFAULT_REPORT_NAME.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: default_report_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top, 50);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.path, "rental_investment_report");
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
weights:
  population: 0.4
  supply: 0.3
  demand: 0.3
filters:
  min_population: 10000
  max_listings: 500
top: 20
output:
  format: all
  path: reports/phoenix
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.weights, ScoreWeights::new(0.4, 0.3, 0.3));
        assert_eq!(config.filters.min_population, Some(10_000));
        assert_eq!(config.filters.max_listings, Some(500));
        assert_eq!(config.filters.min_score, None);
        assert_eq!(config.top, 20);
        assert_eq!(config.output.format, OutputFormat::All);
        assert_eq!(config.output.path, "reports/phoenix");
    }

    #[test]
    fn test_unknown_weight_rejected() {
        let yaml = r#"
weights:
  population: 0.4
  vacancy: 0.1
"#;
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_roundtrip_yaml() {
        let config = Config {
            top: 10,
            ..Config::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = Config {
            weights: ScoreWeights::new(-1.0, 0.5, f64::NAN),
            top: 0,
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("weights.population")));
        assert!(errors.iter().any(|e| e.contains("weights.demand")));
        assert!(errors.iter().any(|e| e.contains("top")));
    }

    #[test]
    fn test_validate_empty_output_path() {
        let config = Config {
            output: OutputConfig {
                format: OutputFormat::Json,
                path: "  ".to_string(),
            },
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["output.path: must not be empty".to_string()]);
    }
}
