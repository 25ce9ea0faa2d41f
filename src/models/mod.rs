// Model exports
pub mod domain;
pub mod lenient;
pub mod requests;
pub mod responses;

pub use domain::{
    Budget, Criteria, Criterion, Customer, CustomerStatus, LocationCriteria, MatchResult,
    Property, PropertyLocation, PropertyStatus, PropertyType, ScoreBreakdown, ScoringWeights,
    TopMatch,
};
pub use requests::{LimitQuery, MapMarkersRequest, MatchPropertyRequest, MinScoreQuery, TopMatchesRequest};
pub use responses::{
    ErrorResponse, HealthResponse, MapMarker, MapMarkersResponse, MatchPropertyResponse,
    TopMatchesResponse,
};
