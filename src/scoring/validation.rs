use super::config::ScoreWeights;

/// Allowed drift of the weight sum away from 1.0 before a warning is issued.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Validate scoring weights at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_weights(weights: &ScoreWeights) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, value) in [
        ("population", weights.population),
        ("supply", weights.supply),
        ("demand", weights.demand),
    ] {
        if !value.is_finite() {
            errors.push(format!("weights.{}: must be a finite number", name));
        } else if value < 0.0 {
            errors.push(format!("weights.{}: must be non-negative (got {})", name, value));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A warning when the weights do not sum to 1.0. Not an error: scores are
/// still well defined, just no longer a weighted average.
pub fn weight_sum_warning(weights: &ScoreWeights) -> Option<String> {
    let total = weights.total();
    if total.is_finite() && (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        Some(format!(
            "weights sum to {:.3}, not 1.0; investment scores will be scaled accordingly",
            total
        ))
    } else {
        None
    }
}
