use proptest::prelude::*;
use rent_rank::metrics::AreaMetrics;
use rent_rank::ranking::{rank_areas, RankOptions};
use rent_rank::scoring::curves::{population_curve, supply_curve};
use rent_rank::scoring::{calculate_score, composite_score, ScoreWeights};

fn in_range(score: f64) -> bool {
    (0.0..=100.0).contains(&score)
}

prop_compose! {
    fn arb_metrics()(
        population in 0u64..2_000_000,
        renter_occupied in 0u64..500_000,
        owner_occupied in 0u64..500_000,
        total_listings in 0u64..50_000,
        days_on_market in proptest::option::of(0.0f64..365.0),
        rent_growth_yoy in proptest::option::of(-0.5f64..0.5),
        search_volume_index in proptest::option::of(-50.0f64..200.0),
        direct_demand_index in proptest::option::of(-1.0f64..2.0),
    ) -> AreaMetrics {
        AreaMetrics {
            population,
            renter_occupied,
            owner_occupied,
            total_listings,
            days_on_market,
            rent_growth_yoy,
            search_volume_index,
            direct_demand_index,
            ..AreaMetrics::default()
        }
    }
}

prop_compose! {
    fn arb_weights()(
        population in 0.0f64..1.0,
        supply in 0.0f64..1.0,
        demand in 0.0f64..1.0,
    ) -> ScoreWeights {
        let total = population + supply + demand;
        if total == 0.0 {
            ScoreWeights::equal()
        } else {
            ScoreWeights::new(population / total, supply / total, demand / total)
        }
    }
}

proptest! {
    #[test]
    fn scores_stay_in_range(metrics in arb_metrics(), weights in arb_weights()) {
        let result = calculate_score(&metrics, &weights);
        prop_assert!(in_range(result.population_score));
        prop_assert!(in_range(result.supply_score));
        prop_assert!(in_range(result.demand_score));
        prop_assert!(in_range(result.investment_score), "score {}", result.investment_score);
    }

    #[test]
    fn population_curve_is_monotonic(a in 0.0f64..1_000_000.0, b in 0.0f64..1_000_000.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(population_curve(low) <= population_curve(high) + 1e-9);
    }

    #[test]
    fn supply_curve_is_non_increasing(a in 0.0f64..200.0, b in 0.0f64..200.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(supply_curve(low) + 1e-9 >= supply_curve(high));
    }

    #[test]
    fn equal_weights_preserve_equal_components(s in 0.0f64..=100.0) {
        let score = composite_score(s, s, s, &ScoreWeights::equal());
        prop_assert!((score - s).abs() < 0.0051, "{} vs {}", score, s);
    }

    #[test]
    fn scoring_is_deterministic(metrics in arb_metrics(), weights in arb_weights()) {
        prop_assert_eq!(calculate_score(&metrics, &weights), calculate_score(&metrics, &weights));
    }

    #[test]
    fn parallel_ranking_matches_sequential(
        batch in proptest::collection::vec(arb_metrics(), 0..40),
    ) {
        let areas: Vec<(String, AreaMetrics)> = batch
            .into_iter()
            .enumerate()
            .map(|(i, metrics)| (format!("{:05}", i), metrics))
            .collect();
        let weights = ScoreWeights::default();

        let parallel = rank_areas(&areas, &weights, &RankOptions::default());
        let sequential = rank_areas(
            &areas,
            &weights,
            &RankOptions { parallel: false, ..RankOptions::default() },
        );
        prop_assert_eq!(parallel, sequential);
    }

    #[test]
    fn ranking_is_sorted(batch in proptest::collection::vec(arb_metrics(), 1..40)) {
        let areas: Vec<(String, AreaMetrics)> = batch
            .into_iter()
            .enumerate()
            .map(|(i, metrics)| (format!("{:05}", i), metrics))
            .collect();
        let ranked = rank_areas(&areas, &ScoreWeights::default(), &RankOptions::default());

        prop_assert_eq!(ranked.len(), areas.len());
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.result.investment_score > b.result.investment_score
                    || (a.result.investment_score == b.result.investment_score && a.zipcode < b.zipcode)
            );
        }
    }
}
