//! Portfolio Matcher - property-to-customer matching for real-estate portfolios
//!
//! This library scores how well a listing fits each customer's demand profile.
//! Six weighted criteria groups (status, type, location, budget, rooms and
//! features) add up to a 0-100 score, and every group is reported back as
//! matched or unmatched so agents can see why a customer was suggested.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{match_property_to_customers, Matcher, NeighborhoodGeocoder};
pub use models::{Criteria, Criterion, Customer, MatchResult, Property, ScoringWeights, TopMatch};
