use crate::models::{Budget, Criteria, LocationCriteria, Property, PropertyLocation};
use std::collections::BTreeMap;

/// Raw location points for a province match
pub const PROVINCE_POINTS: u32 = 5;
/// Raw location points for a district match
pub const DISTRICT_POINTS: u32 = 7;
/// Raw location points for an accepted neighborhood
pub const NEIGHBORHOOD_POINTS: u32 = 8;
pub const LOCATION_MAX_POINTS: u32 = PROVINCE_POINTS + DISTRICT_POINTS + NEIGHBORHOOD_POINTS;

/// Relative distance from a budget bound that still counts as a near miss
pub const NEAR_MISS_TOLERANCE: f64 = 0.10;

/// How a price relates to a customer's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetFit {
    Within,
    /// Outside the range but within the tolerance band of a bound
    Near,
    Outside,
}

#[inline]
pub fn status_matches(property: &Property, criteria: &Criteria) -> bool {
    matches!((property.status, criteria.status), (Some(have), Some(want)) if have == want)
}

#[inline]
pub fn type_matches(property: &Property, criteria: &Criteria) -> bool {
    property
        .property_type
        .is_some_and(|t| criteria.types.contains(&t))
}

/// Raw location points out of [`LOCATION_MAX_POINTS`]
///
/// Province and district must match exactly; the neighborhood only has to be
/// one of the accepted ones. Criteria the customer left empty earn nothing.
pub fn location_points(location: Option<&PropertyLocation>, wanted: Option<&LocationCriteria>) -> u32 {
    let (Some(location), Some(wanted)) = (location, wanted) else {
        return 0;
    };

    let mut points = 0;
    if wanted.province.is_some() && wanted.province == location.province {
        points += PROVINCE_POINTS;
    }
    if wanted.district.is_some() && wanted.district == location.district {
        points += DISTRICT_POINTS;
    }
    if let Some(neighborhood) = &location.neighborhood {
        if wanted.neighborhoods.contains(neighborhood) {
            points += NEIGHBORHOOD_POINTS;
        }
    }
    points
}

/// Classify a price against an inclusive budget range
///
/// A missing `min` is 0 and a missing `max` leaves the range open. The near
/// miss band is measured relative to each bound, with the divisor floored at 1
/// so a zero bound cannot divide by zero.
pub fn budget_fit(price: Option<f64>, budget: Option<&Budget>) -> BudgetFit {
    let (Some(price), Some(budget)) = (price, budget) else {
        return BudgetFit::Outside;
    };

    let min = budget.min.unwrap_or(0.0);
    let above_min = price >= min;
    let below_max = budget.max.map_or(true, |max| price <= max);
    if above_min && below_max {
        return BudgetFit::Within;
    }

    let near = |bound: f64| (price - bound).abs() / bound.max(1.0) <= NEAR_MISS_TOLERANCE;
    if near(min) || budget.max.is_some_and(near) {
        BudgetFit::Near
    } else {
        BudgetFit::Outside
    }
}

/// Leading bedroom count of a room label such as `"3+1"`; 0 if unparseable
///
/// Counts too large for `u32` saturate at `u32::MAX`.
pub fn parse_rooms(label: &str) -> u32 {
    let head = label.split('+').next().unwrap_or_default().trim_start();
    head.chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |count, digit| count.saturating_mul(10).saturating_add(digit))
}

#[inline]
pub fn rooms_satisfied(rooms: Option<&str>, min_rooms: Option<&str>) -> bool {
    match (rooms, min_rooms) {
        (Some(rooms), Some(min_rooms)) => parse_rooms(rooms) >= parse_rooms(min_rooms),
        _ => false,
    }
}

/// Count `(agreeing, specified)` over the features the customer asked about
pub fn feature_agreement(have: &BTreeMap<String, bool>, want: &BTreeMap<String, bool>) -> (u32, u32) {
    want.iter().fold((0, 0), |(agreeing, specified), (name, wanted)| {
        let agrees = have.get(name) == Some(wanted);
        (agreeing + u32::from(agrees), specified + 1)
    })
}
