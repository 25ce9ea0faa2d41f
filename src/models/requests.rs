use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Customer, Property};

/// Request to score one property against a set of customers
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchPropertyRequest {
    pub property: Property,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[validate(range(max = 100))]
    #[serde(alias = "min_score")]
    pub min_score: Option<u8>,
}

/// Request to find the best property/customer pairs across many listings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopMatchesRequest {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[validate(range(max = 100))]
    #[serde(alias = "min_score")]
    pub min_score: Option<u8>,
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

/// Query string for stored-portfolio match lookups
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MinScoreQuery {
    #[validate(range(max = 100))]
    #[serde(alias = "min_score")]
    pub min_score: Option<u8>,
}

/// Query string for the dashboard aggregation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LimitQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

/// Request for map markers of a set of listings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkersRequest {
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Neighborhood to measure distances from
    #[validate(length(min = 1))]
    pub center: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(alias = "radius_km")]
    pub radius_km: Option<f64>,
}
