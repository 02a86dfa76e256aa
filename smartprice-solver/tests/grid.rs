use approx::assert_abs_diff_eq;
use rstest::*;
use smartprice_core::models::{FeatureRecord, PricingScenario, seasonality_index};
use smartprice_solver::{GridSearchOptimizer, linspace};
use std::cell::RefCell;

fn linear_in_price(features: &FeatureRecord) -> f64 {
    1000.0 - 2.0 * features.price
}

fn driven_by_gap(features: &FeatureRecord) -> f64 {
    500.0 + 2000.0 * features.price_gap
}

// Demand that collapses entirely above a threshold
fn kinked(features: &FeatureRecord) -> f64 {
    if features.price > 333.0 { 0.0 } else { 40.0 }
}

#[fixture]
pub fn scenario() -> PricingScenario {
    PricingScenario::new("Reagent", "Academia", 80.0, 50.0)
}

// The grid optimum agrees with an exhaustive sweep at a much finer resolution
// to within one grid step.
#[rstest]
#[case::linear(linear_in_price, 1.0, 5000.0, 200)]
#[case::gap(driven_by_gap, 1.0, 200.0, 50)]
#[case::kinked(kinked, 10.0, 1000.0, 34)]
fn agrees_with_brute_force(
    scenario: PricingScenario,
    #[case] predictor: fn(&FeatureRecord) -> f64,
    #[case] min_price: f64,
    #[case] max_price: f64,
    #[case] num_points: usize,
) {
    let scenario = PricingScenario {
        min_price,
        max_price,
        num_points,
        ..scenario
    };
    let recommendation = GridSearchOptimizer::default()
        .optimize(&scenario, &predictor)
        .unwrap();

    let profit = |p: f64| (p - scenario.unit_cost) * predictor(&scenario.features_at(p)).max(0.0);
    let (fine_price, fine_profit) = linspace(min_price, max_price, 100_000)
        .map(|p| (p, profit(p)))
        .fold((f64::NAN, f64::NEG_INFINITY), |best, (p, v)| {
            if v > best.1 { (p, v) } else { best }
        });

    let step = (max_price - min_price) / (num_points - 1) as f64;
    assert!((recommendation.recommended_price - fine_price).abs() <= step);
    assert!(recommendation.expected_profit <= fine_profit + 1e-9);
    assert_abs_diff_eq!(
        recommendation.expected_profit,
        profit(recommendation.recommended_price),
        epsilon = 1e-9
    );

    assert_eq!(recommendation.price_grid_min, min_price);
    assert_eq!(recommendation.price_grid_max, max_price);
    assert_eq!(recommendation.num_grid_points, num_points);
}

#[rstest]
fn every_candidate_sees_its_own_features(scenario: PricingScenario) {
    let scenario = PricingScenario {
        month: 3,
        min_price: 10.0,
        max_price: 100.0,
        num_points: 10,
        ..scenario
    };
    let seen = RefCell::new(Vec::new());
    let predictor = |features: &FeatureRecord| {
        seen.borrow_mut().push(features.clone());
        1.0
    };

    GridSearchOptimizer::default()
        .optimize(&scenario, &predictor)
        .unwrap();

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 10);
    for (features, price) in seen.iter().zip(linspace(10.0, 100.0, 10)) {
        assert_eq!(features.price, price);
        // Reagent's default base price is 75
        assert_abs_diff_eq!(features.price_gap, (80.0 - price) / 75.0, epsilon = 1e-12);
        assert_abs_diff_eq!(features.seasonality_index, seasonality_index(3), epsilon = 1e-12);
        assert_eq!(features.product_type, "Reagent");
        assert_eq!(features.month, 3);
        assert_eq!(features.day_of_week, 2);
    }
}

#[rstest]
fn ties_go_to_the_lowest_price(scenario: PricingScenario) {
    // profit is (p - 50) * 100 / (p - 50) = 100 for every price above cost
    let scenario = PricingScenario {
        min_price: 60.0,
        max_price: 150.0,
        num_points: 10,
        ..scenario
    };
    let predictor = |features: &FeatureRecord| 100.0 / (features.price - 50.0);

    let recommendation = GridSearchOptimizer::default()
        .optimize(&scenario, &predictor)
        .unwrap();
    assert_eq!(recommendation.recommended_price, 60.0);
}

#[rstest]
fn single_point_grid_is_the_minimum(scenario: PricingScenario) {
    let scenario = PricingScenario {
        min_price: 120.0,
        max_price: 900.0,
        num_points: 1,
        ..scenario
    };
    let recommendation = GridSearchOptimizer::default()
        .optimize(&scenario, &linear_in_price)
        .unwrap();

    assert_eq!(recommendation.recommended_price, 120.0);
    assert_abs_diff_eq!(recommendation.expected_profit, 70.0 * 760.0, epsilon = 1e-9);
    // only min_price was evaluated, so both reported bounds are min_price
    assert_eq!(recommendation.price_grid_min, 120.0);
    assert_eq!(recommendation.price_grid_max, 120.0);
    assert_eq!(recommendation.num_grid_points, 1);
}
