use crate::core::criteria::{
    budget_fit, feature_agreement, location_points, rooms_satisfied, status_matches, type_matches,
    BudgetFit, LOCATION_MAX_POINTS,
};
use crate::models::{Criteria, Criterion, Property, ScoreBreakdown, ScoringWeights};

/// Outcome of scoring one customer's criteria against a property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaScore {
    pub breakdown: ScoreBreakdown,
    pub matched: Vec<Criterion>,
    pub unmatched: Vec<Criterion>,
}

impl CriteriaScore {
    /// Final score, clamped to 0..=100
    pub fn score(&self) -> u8 {
        self.breakdown.total()
    }

    fn record(&mut self, criterion: Criterion, matched: bool) {
        if matched {
            self.matched.push(criterion);
        } else {
            self.unmatched.push(criterion);
        }
    }
}

/// `round(points / out_of * weight)` with halves rounded up
///
/// Integer arithmetic keeps scores reproducible; every group is rounded on
/// its own before the groups are summed. Computed in `u64` so any configured
/// weight fits; the result saturates at `u32::MAX`.
#[inline]
pub fn scale_points(points: u32, out_of: u32, weight: u32) -> u32 {
    if out_of == 0 {
        return 0;
    }
    let numerator = 2u64
        .saturating_mul(u64::from(points))
        .saturating_mul(u64::from(weight))
        .saturating_add(u64::from(out_of));
    let scaled = numerator / (2 * u64::from(out_of));
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Score a property against one customer's criteria
///
/// Groups are evaluated in a fixed order (status, type, location, budget,
/// rooms, features) and each lands in exactly one of the matched/unmatched
/// lists. Missing criteria leave every group unmatched with zero points.
///
/// Group rules:
/// - status: full weight on an exact match
/// - type: full weight if the property type is one of the accepted types
/// - location: province 5 + district 7 + neighborhood 8, scaled out of 20
/// - budget: full weight inside the range, half weight on a near miss
/// - rooms: full weight if the leading room count reaches the minimum
/// - features: weight times the share of specified features that agree
pub fn score_criteria(
    property: &Property,
    criteria: Option<&Criteria>,
    weights: &ScoringWeights,
) -> CriteriaScore {
    let mut result = CriteriaScore::default();

    let Some(criteria) = criteria else {
        result.unmatched = vec![
            Criterion::Status,
            Criterion::PropertyType,
            Criterion::Location,
            Criterion::Budget,
            Criterion::Rooms,
            Criterion::Features,
        ];
        return result;
    };

    let status = status_matches(property, criteria);
    if status {
        result.breakdown.status = weights.status;
    }
    result.record(Criterion::Status, status);

    let property_type = type_matches(property, criteria);
    if property_type {
        result.breakdown.property_type = weights.property_type;
    }
    result.record(Criterion::PropertyType, property_type);

    let raw_location = location_points(property.location.as_ref(), criteria.location.as_ref());
    result.breakdown.location = scale_points(raw_location, LOCATION_MAX_POINTS, weights.location);
    result.record(Criterion::Location, raw_location > 0);

    match budget_fit(property.price, criteria.budget.as_ref()) {
        BudgetFit::Within => {
            result.breakdown.budget = weights.budget;
            result.matched.push(Criterion::Budget);
        }
        BudgetFit::Near => {
            result.breakdown.budget = scale_points(1, 2, weights.budget);
            result.unmatched.push(Criterion::BudgetNear);
        }
        BudgetFit::Outside => result.unmatched.push(Criterion::Budget),
    }

    let rooms = rooms_satisfied(property.rooms.as_deref(), criteria.min_rooms.as_deref());
    if rooms {
        result.breakdown.rooms = weights.rooms;
    }
    result.record(Criterion::Rooms, rooms);

    let (agreeing, specified) = feature_agreement(&property.features, &criteria.features);
    result.breakdown.features = scale_points(agreeing, specified, weights.features);
    result.record(Criterion::Features, agreeing > 0);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, LocationCriteria, PropertyLocation, PropertyStatus, PropertyType};
    use std::collections::BTreeMap;

    fn create_test_property() -> Property {
        Property {
            id: Some("p1".to_string()),
            status: Some(PropertyStatus::ForSale),
            property_type: Some(PropertyType::Apartment),
            location: Some(PropertyLocation {
                province: Some("istanbul".to_string()),
                district: Some("kadikoy".to_string()),
                neighborhood: Some("moda".to_string()),
            }),
            price: Some(4_000_000.0),
            rooms: Some("3+1".to_string()),
            features: BTreeMap::from([("balcony".to_string(), true)]),
            ..Default::default()
        }
    }

    fn create_test_criteria() -> Criteria {
        Criteria {
            status: Some(PropertyStatus::ForSale),
            types: vec![PropertyType::Apartment],
            location: Some(LocationCriteria {
                province: Some("istanbul".to_string()),
                district: Some("kadikoy".to_string()),
                neighborhoods: vec!["moda".to_string()],
            }),
            budget: Some(Budget { min: None, max: Some(5_000_000.0) }),
            min_rooms: Some("2+1".to_string()),
            features: BTreeMap::from([("balcony".to_string(), true)]),
        }
    }

    #[test]
    fn test_scale_points_rounds_half_up() {
        assert_eq!(scale_points(1, 2, 15), 8);
        assert_eq!(scale_points(3, 5, 15), 9);
        assert_eq!(scale_points(1, 2, 20), 10);
        assert_eq!(scale_points(1, 3, 15), 5);
        assert_eq!(scale_points(8, 20, 20), 8);
        assert_eq!(scale_points(2, 3, 10), 7);
        assert_eq!(scale_points(1, 0, 15), 0);
    }

    #[test]
    fn test_full_match() {
        let score = score_criteria(&create_test_property(), Some(&create_test_criteria()), &ScoringWeights::default());

        assert_eq!(score.score(), 100);
        assert_eq!(score.matched.len(), 6);
        assert!(score.unmatched.is_empty());
    }

    #[test]
    fn test_missing_criteria() {
        let score = score_criteria(&create_test_property(), None, &ScoringWeights::default());

        assert_eq!(score.score(), 0);
        assert!(score.matched.is_empty());
        assert_eq!(score.unmatched.len(), 6);
    }

    #[test]
    fn test_empty_criteria_scores_zero() {
        let score = score_criteria(&create_test_property(), Some(&Criteria::default()), &ScoringWeights::default());

        assert_eq!(score.score(), 0);
        assert_eq!(
            score.unmatched,
            vec![
                Criterion::Status,
                Criterion::PropertyType,
                Criterion::Location,
                Criterion::Budget,
                Criterion::Rooms,
                Criterion::Features,
            ]
        );
    }

    #[test]
    fn test_near_budget_is_unmatched_with_half_points() {
        let mut property = create_test_property();
        property.price = Some(5_400_000.0);

        let score = score_criteria(&property, Some(&create_test_criteria()), &ScoringWeights::default());

        assert_eq!(score.breakdown.budget, 10);
        assert_eq!(score.unmatched, vec![Criterion::BudgetNear]);
        assert_eq!(score.score(), 90);
    }

    #[test]
    fn test_scores_clamped_with_oversized_weights() {
        let weights = ScoringWeights {
            status: 60,
            property_type: 60,
            ..ScoringWeights::default()
        };
        let score = score_criteria(&create_test_property(), Some(&create_test_criteria()), &weights);

        assert_eq!(score.score(), 100);
    }

    #[test]
    fn test_huge_weights_saturate_instead_of_overflowing() {
        let weights = ScoringWeights {
            features: 3_000_000_000,
            ..ScoringWeights::default()
        };
        let mut property = create_test_property();
        property.features = BTreeMap::from([("balcony".to_string(), true), ("parking".to_string(), true)]);
        let mut criteria = create_test_criteria();
        criteria.features = property.features.clone();

        let score = score_criteria(&property, Some(&criteria), &weights);

        assert_eq!(score.breakdown.features, 3_000_000_000);
        assert_eq!(score.score(), 100);
        assert_eq!(scale_points(u32::MAX, 1, u32::MAX), u32::MAX);
    }

    #[test]
    fn test_location_scaled_by_weight() {
        let weights = ScoringWeights {
            location: 10,
            ..ScoringWeights::default()
        };
        let mut criteria = create_test_criteria();
        criteria.location = Some(LocationCriteria {
            district: Some("kadikoy".to_string()),
            ..Default::default()
        });

        let score = score_criteria(&create_test_property(), Some(&criteria), &weights);

        // 7 of 20 raw points on a weight of 10 is 3.5, rounded up
        assert_eq!(score.breakdown.location, 4);
        assert!(score.matched.contains(&Criterion::Location));
    }
}
