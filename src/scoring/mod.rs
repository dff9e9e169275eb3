pub mod components;
pub mod config;
pub mod curves;
pub mod engine;
pub mod validation;

pub use components::{demand_score, population_score, supply_score, DemandBreakdown};
pub use config::ScoreWeights;
pub use curves::{Curve, Segment, UpperBound, NEUTRAL_SCORE};
pub use engine::{
    calculate_score, composite_score, explain_score, round_score, FactorContribution, Rating,
    ScoreBreakdown, ScoreResult,
};
pub use validation::{validate_weights, weight_sum_warning};
