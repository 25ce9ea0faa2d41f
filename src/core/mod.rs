// Core algorithm exports
pub mod criteria;
pub mod distance;
pub mod matcher;
pub mod scoring;

pub use criteria::{budget_fit, parse_rooms, BudgetFit};
pub use distance::{haversine_distance, NeighborhoodGeocoder};
pub use matcher::{match_property_to_customers, Matcher, UNKNOWN_ID};
pub use scoring::{scale_points, score_criteria, CriteriaScore};
