use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchResult, TopMatch};

/// Response for the single-property match endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPropertyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    pub matches: Vec<MatchResult>,
    pub total_customers: usize,
}

/// Response for the batch top-matches endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMatchesResponse {
    pub matches: Vec<TopMatch>,
    pub total_properties: usize,
    pub total_customers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub property_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub neighborhood: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapMarkersResponse {
    pub markers: Vec<MapMarker>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
