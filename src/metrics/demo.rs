//! Deterministic demo metrics.
//!
//! Used when no input file is given, so the ranking pipeline can be tried
//! without any data provider. Values are derived from a seed (the sum of the
//! zip code's character codes) and are stable across runs.

use super::types::AreaMetrics;

pub const DEMO_SOURCE: &str = "demo_data";

pub fn demo_seed(zipcode: &str) -> u64 {
    zipcode.chars().map(|c| c as u64).sum()
}

pub fn demo_metrics(zipcode: &str) -> AreaMetrics {
    let seed = demo_seed(zipcode);

    let population = 5_000 + (seed * 97) % 60_000;
    // Roughly 2.5 people per household
    let households = population * 2 / 5;
    let renter_share = 25 + seed % 50; // percent
    let renter_occupied = households * renter_share / 100;
    let owner_occupied = households - renter_occupied;

    AreaMetrics {
        population,
        renter_occupied,
        owner_occupied,
        median_income: Some((40_000 + (seed * 31) % 80_000) as f64),
        total_listings: seed % 300 + 50,
        days_on_market: Some((15 + seed % 45) as f64),
        rent_growth_yoy: Some(((seed % 20) as f64 - 5.0) / 100.0),
        search_volume_index: Some((seed % 100) as f64),
        direct_demand_index: Some((seed % 100) as f64 / 100.0),
        average_rent: Some((1_000 + seed % 2_000) as f64),
        data_source: Some(DEMO_SOURCE.to_string()),
    }
}

pub fn demo_areas<S: AsRef<str>>(zipcodes: &[S]) -> Vec<(String, AreaMetrics)> {
    zipcodes
        .iter()
        .map(|z| (z.as_ref().to_string(), demo_metrics(z.as_ref())))
        .collect()
}
