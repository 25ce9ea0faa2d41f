use crate::models::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Sale or rental intent of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    ForSale,
    ForRent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Business,
    Land,
}

/// Lifecycle of a customer demand profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Passive,
    /// The customer already found a property
    Found,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyLocation {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
}

/// A listing ("portfolio") being evaluated against demand profiles
///
/// Every field is optional: a listing with missing data is still matched,
/// it just cannot satisfy the criteria that depend on the missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub property_type: Option<PropertyType>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub location: Option<PropertyLocation>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Room configuration such as `"3+1"`
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub rooms: Option<String>,
    #[serde(
        alias = "area_sqm",
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub area_sqm: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flags")]
    pub features: BTreeMap<String, bool>,
    #[serde(alias = "image_urls", default, deserialize_with = "lenient::list")]
    pub image_urls: Vec<String>,
}

impl Property {
    pub fn neighborhood(&self) -> Option<&str> {
        self.location.as_ref()?.neighborhood.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCriteria {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Any one of these is acceptable
    #[serde(default, deserialize_with = "lenient::list")]
    pub neighborhoods: Vec<String>,
}

/// Inclusive price range; a missing `min` means 0 and a missing `max` leaves
/// the range open above
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// What a customer is looking for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    /// Any one of these is acceptable
    #[serde(default, deserialize_with = "lenient::list")]
    pub types: Vec<PropertyType>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationCriteria>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(
        alias = "min_rooms",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_rooms: Option<String>,
    /// Only the features listed here are evaluated
    #[serde(default, deserialize_with = "lenient::flags")]
    pub features: BTreeMap<String, bool>,
}

/// Customer demand profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
}

impl Customer {
    /// Customers without a lifecycle status are treated as active
    pub fn is_active(&self) -> bool {
        matches!(self.status, None | Some(CustomerStatus::Active))
    }
}

/// A criteria group as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Status,
    PropertyType,
    Location,
    Budget,
    /// Price outside the range but within the near-miss band
    BudgetNear,
    Rooms,
    Features,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::Status,
        Criterion::PropertyType,
        Criterion::Location,
        Criterion::Budget,
        Criterion::BudgetNear,
        Criterion::Rooms,
        Criterion::Features,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Status => "Listing Status",
            Criterion::PropertyType => "Property Type",
            Criterion::Location => "Location",
            Criterion::Budget => "Budget",
            Criterion::BudgetNear => "Budget (near)",
            Criterion::Rooms => "Rooms",
            Criterion::Features => "Features",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Criterion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Criterion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Criterion::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown criterion label: {}", label)))
    }
}

/// Points contributed by each criteria group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub status: u32,
    #[serde(rename = "type")]
    pub property_type: u32,
    pub location: u32,
    pub budget: u32,
    pub rooms: u32,
    pub features: u32,
}

impl ScoreBreakdown {
    /// Sum of all groups, clamped to 0..=100
    pub fn total(&self) -> u8 {
        let sum = [
            self.status,
            self.property_type,
            self.location,
            self.budget,
            self.rooms,
            self.features,
        ]
        .iter()
        .fold(0u32, |acc, points| acc.saturating_add(*points));
        sum.min(100) as u8
    }
}

/// Compatibility of one customer with one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub customer_id: String,
    pub score: u8,
    pub matched_criteria: Vec<Criterion>,
    pub unmatched_criteria: Vec<Criterion>,
    pub breakdown: ScoreBreakdown,
}

impl MatchResult {
    #[inline]
    pub fn meets(&self, min_score: u8) -> bool {
        self.score >= min_score
    }
}

/// One property/customer pair from a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMatch {
    pub property_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_title: Option<String>,
    pub customer_id: String,
    pub score: u8,
}

/// Points awarded to each criteria group when fully satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub status: u32,
    pub property_type: u32,
    pub location: u32,
    pub budget: u32,
    pub rooms: u32,
    pub features: u32,
}

impl ScoringWeights {
    /// Sum of all weights, saturating at `u32::MAX`
    pub fn total(&self) -> u32 {
        [
            self.status,
            self.property_type,
            self.location,
            self.budget,
            self.rooms,
            self.features,
        ]
        .iter()
        .fold(0u32, |acc, weight| acc.saturating_add(*weight))
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            status: 20,
            property_type: 15,
            location: 20,
            budget: 20,
            rooms: 10,
            features: 15,
        }
    }
}
