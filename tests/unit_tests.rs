// Unit tests for Portfolio Matcher

use portfolio_matcher::core::{
    criteria::{budget_fit, feature_agreement, location_points, parse_rooms, BudgetFit},
    distance::{haversine_distance, normalize_neighborhood, NeighborhoodGeocoder, DEFAULT_COORDINATES},
    scoring::{scale_points, score_criteria},
};
use portfolio_matcher::models::{
    Budget, Criteria, Criterion, LocationCriteria, Property, PropertyLocation, PropertyStatus,
    ScoringWeights,
};
use std::collections::BTreeMap;

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(41.0082, 28.9784, 41.0082, 28.9784);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_istanbul_to_ankara() {
    // Istanbul to Ankara is roughly 350 km as the crow flies
    let distance = haversine_distance(41.0082, 28.9784, 39.9334, 32.8597);
    assert!(distance > 330.0 && distance < 370.0, "got {}", distance);
}

#[test]
fn test_geocoder_falls_back_to_city_center() {
    let geocoder = NeighborhoodGeocoder::default();

    assert_eq!(geocoder.coordinates_for(""), DEFAULT_COORDINATES);
    assert_eq!(geocoder.coordinates_for("Kuzguncuk"), (41.0278, 29.0406));
    assert_eq!(normalize_neighborhood("BEYLERBEYİ"), "beylerbeyi");
}

#[test]
fn test_parse_rooms_labels() {
    assert_eq!(parse_rooms("3+1"), 3);
    assert_eq!(parse_rooms("1+0"), 1);
    assert_eq!(parse_rooms(""), 0);
    assert_eq!(parse_rooms("many"), 0);
}

#[test]
fn test_budget_tolerance_is_inclusive() {
    let budget = Budget { min: Some(1_000_000.0), max: Some(2_000_000.0) };

    assert_eq!(budget_fit(Some(2_200_000.0), Some(&budget)), BudgetFit::Near);
    assert_eq!(budget_fit(Some(900_000.0), Some(&budget)), BudgetFit::Near);
    assert_eq!(budget_fit(Some(899_999.0), Some(&budget)), BudgetFit::Outside);
    assert_eq!(budget_fit(Some(1_500_000.0), Some(&budget)), BudgetFit::Within);
}

#[test]
fn test_location_requires_given_values() {
    let location = PropertyLocation {
        province: Some("istanbul".to_string()),
        district: None,
        neighborhood: Some("moda".to_string()),
    };
    // A district the property lacks cannot match, even if the customer gave one
    let wanted = LocationCriteria {
        province: Some("istanbul".to_string()),
        district: Some("kadikoy".to_string()),
        neighborhoods: vec![],
    };

    assert_eq!(location_points(Some(&location), Some(&wanted)), 5);
}

#[test]
fn test_feature_agreement_ignores_unspecified() {
    let have = BTreeMap::from([("balcony".to_string(), true), ("garden".to_string(), true)]);
    let want = BTreeMap::from([("balcony".to_string(), true)]);

    assert_eq!(feature_agreement(&have, &want), (1, 1));
}

#[test]
fn test_rounding_is_half_up() {
    // 0.5 steps round up
    assert_eq!(scale_points(1, 2, 15), 8);
    assert_eq!(scale_points(1, 2, 5), 3);
    // Below half rounds down
    assert_eq!(scale_points(1, 3, 10), 3);
    assert_eq!(scale_points(4, 4, 15), 15);
}

#[test]
fn test_status_only_customer() {
    let property = Property {
        status: Some(PropertyStatus::ForRent),
        ..Default::default()
    };
    let criteria = Criteria {
        status: Some(PropertyStatus::ForRent),
        ..Default::default()
    };

    let score = score_criteria(&property, Some(&criteria), &ScoringWeights::default());

    assert_eq!(score.score(), 20);
    assert_eq!(score.matched, vec![Criterion::Status]);
    assert_eq!(score.unmatched.len(), 5);
}
