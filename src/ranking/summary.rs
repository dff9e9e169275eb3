use serde::Serialize;
use std::collections::BTreeMap;

use super::ranker::RankedArea;
use crate::scoring::{round_score, Rating};

/// Aggregate statistics over a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_areas: usize,
    pub avg_investment_score: f64,
    pub avg_population: f64,
    pub avg_renter_ratio: f64,
    pub avg_listings: f64,
    /// Mean over the areas that reported a rent; None when none did
    pub avg_rent: Option<f64>,
    pub top_zipcode: String,
    pub top_score: f64,
    pub rating_counts: BTreeMap<Rating, usize>,
}

/// Summarize a ranked list, best area first. Returns None for an empty list.
pub fn summarize(ranked: &[RankedArea]) -> Option<Summary> {
    let top = ranked.first()?;
    let n = ranked.len() as f64;

    let mean = |f: fn(&RankedArea) -> f64| ranked.iter().map(f).sum::<f64>() / n;

    let rents: Vec<f64> = ranked
        .iter()
        .filter_map(|area| area.metrics.average_rent)
        .collect();
    let avg_rent = if rents.is_empty() {
        None
    } else {
        Some(rents.iter().sum::<f64>() / rents.len() as f64)
    };

    let mut rating_counts = BTreeMap::new();
    for area in ranked {
        *rating_counts.entry(area.result.rating).or_insert(0) += 1;
    }

    Some(Summary {
        total_areas: ranked.len(),
        avg_investment_score: round_score(mean(|a| a.result.investment_score)),
        avg_population: mean(|a| a.metrics.population as f64),
        avg_renter_ratio: mean(|a| a.renter_ratio),
        avg_listings: mean(|a| a.metrics.total_listings as f64),
        avg_rent,
        top_zipcode: top.zipcode.clone(),
        top_score: top.result.investment_score,
        rating_counts,
    })
}
