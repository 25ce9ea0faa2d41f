use crate::core::scoring::score_criteria;
use crate::models::{Customer, MatchResult, Property, ScoringWeights, TopMatch};
use rayon::prelude::*;

/// Id reported for customers and properties that arrive without one
pub const UNKNOWN_ID: &str = "unknown";

/// Scores listings against customer demand profiles
///
/// Six weighted criteria groups (status, type, location, budget, rooms,
/// features) add up to a 0-100 compatibility score, and every group is
/// reported back as matched or unmatched so the score can be explained.
/// Matching is pure: no I/O and no shared state, so a `Matcher` can be
/// cloned into every worker and called concurrently.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single customer against a property
    pub fn score_customer(&self, property: &Property, customer: &Customer) -> MatchResult {
        let scored = score_criteria(property, customer.criteria.as_ref(), &self.weights);

        MatchResult {
            customer_id: customer
                .id
                .clone()
                .unwrap_or_else(|| UNKNOWN_ID.to_string()),
            score: scored.score(),
            matched_criteria: scored.matched,
            unmatched_criteria: scored.unmatched,
            breakdown: scored.breakdown,
        }
    }

    /// Score every customer against a property
    ///
    /// Returns one result per customer, best score first. The sort is stable,
    /// so customers with equal scores keep their input order.
    pub fn match_property(&self, property: &Property, customers: &[Customer]) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = customers
            .iter()
            .map(|customer| self.score_customer(property, customer))
            .collect();

        results.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            "Scored {} customers for property {}",
            results.len(),
            property.id.as_deref().unwrap_or(UNKNOWN_ID)
        );

        results
    }

    /// Best property/customer pairs across many properties
    ///
    /// Properties are matched in parallel. Pairs below `min_score` are
    /// dropped; the rest are ordered by score, then by property order, then by
    /// each property's own ranking, and cut to `limit`.
    pub fn top_matches(
        &self,
        properties: &[Property],
        customers: &[Customer],
        min_score: u8,
        limit: usize,
    ) -> Vec<TopMatch> {
        let mut pairs: Vec<TopMatch> = properties
            .par_iter()
            .map(|property| {
                self.match_property(property, customers)
                    .into_iter()
                    .filter(|result| result.meets(min_score))
                    .map(|result| TopMatch {
                        property_id: property
                            .id
                            .clone()
                            .unwrap_or_else(|| UNKNOWN_ID.to_string()),
                        property_title: property.title.clone(),
                        customer_id: result.customer_id,
                        score: result.score,
                    })
                    .collect::<Vec<_>>()
            })
            .flatten()
            .collect();

        pairs.sort_by(|a, b| b.score.cmp(&a.score));
        pairs.truncate(limit);

        tracing::debug!(
            "Found {} pairs at or above {} across {} properties",
            pairs.len(),
            min_score,
            properties.len()
        );

        pairs
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Score customers against a property with the default weights
pub fn match_property_to_customers(property: &Property, customers: &[Customer]) -> Vec<MatchResult> {
    Matcher::with_default_weights().match_property(property, customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Criteria, Criterion, PropertyStatus, PropertyType};

    fn create_property(id: &str, status: PropertyStatus, price: f64) -> Property {
        Property {
            id: Some(id.to_string()),
            status: Some(status),
            property_type: Some(PropertyType::Apartment),
            price: Some(price),
            rooms: Some("2+1".to_string()),
            ..Default::default()
        }
    }

    fn create_customer(id: &str, status: PropertyStatus, max: f64) -> Customer {
        Customer {
            id: Some(id.to_string()),
            criteria: Some(Criteria {
                status: Some(status),
                types: vec![PropertyType::Apartment],
                budget: Some(Budget { min: None, max: Some(max) }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_match_property_basic() {
        let matcher = Matcher::with_default_weights();
        let property = create_property("p1", PropertyStatus::ForSale, 1_000_000.0);

        let customers = vec![
            create_customer("renter", PropertyStatus::ForRent, 50_000.0),
            create_customer("buyer", PropertyStatus::ForSale, 2_000_000.0),
        ];

        let results = matcher.match_property(&property, &customers);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].customer_id, "buyer");
        assert_eq!(results[0].score, 55);
        assert_eq!(results[1].customer_id, "renter");
        assert_eq!(results[1].score, 15);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::with_default_weights();
        let property = create_property("p1", PropertyStatus::ForSale, 1_000_000.0);

        let customers: Vec<Customer> = ["a", "b", "c"]
            .iter()
            .map(|id| create_customer(id, PropertyStatus::ForSale, 2_000_000.0))
            .collect();

        let ids: Vec<String> = matcher
            .match_property(&property, &customers)
            .into_iter()
            .map(|r| r.customer_id)
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_customer_without_id_or_criteria() {
        let matcher = Matcher::with_default_weights();
        let property = create_property("p1", PropertyStatus::ForSale, 1_000_000.0);

        let results = matcher.match_property(&property, &[Customer::default()]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].customer_id, UNKNOWN_ID);
        assert_eq!(results[0].score, 0);
        assert_eq!(results[0].unmatched_criteria.len(), 6);
        assert!(!results[0].unmatched_criteria.contains(&Criterion::BudgetNear));
    }

    #[test]
    fn test_empty_customers() {
        let matcher = Matcher::default();
        let property = create_property("p1", PropertyStatus::ForSale, 1.0);

        assert!(matcher.match_property(&property, &[]).is_empty());
    }

    #[test]
    fn test_top_matches_threshold_and_limit() {
        let matcher = Matcher::with_default_weights();
        let properties = vec![
            create_property("sale", PropertyStatus::ForSale, 1_000_000.0),
            create_property("rent", PropertyStatus::ForRent, 20_000.0),
        ];
        let customers = vec![
            create_customer("buyer", PropertyStatus::ForSale, 2_000_000.0),
            create_customer("renter", PropertyStatus::ForRent, 25_000.0),
        ];

        let pairs = matcher.top_matches(&properties, &customers, 50, 10);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].property_id, "sale");
        assert_eq!(pairs[0].customer_id, "buyer");
        assert_eq!(pairs[1].property_id, "rent");
        assert_eq!(pairs[1].customer_id, "renter");

        let limited = matcher.top_matches(&properties, &customers, 0, 3);
        assert_eq!(limited.len(), 3);
        assert!(limited.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
