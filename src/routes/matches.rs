use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{Matcher, NeighborhoodGeocoder};
use crate::models::{
    Customer, ErrorResponse, HealthResponse, LimitQuery, MatchPropertyRequest,
    MatchPropertyResponse, MinScoreQuery, TopMatchesRequest, TopMatchesResponse,
};
use crate::services::{PostgresClient, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Listing database; `None` when the service runs stateless
    pub store: Option<Arc<PostgresClient>>,
    pub matcher: Matcher,
    pub geocoder: Arc<NeighborhoodGeocoder>,
    pub matching: MatchingSettings,
}

impl AppState {
    /// State without a database, serving only the request-body endpoints
    pub fn stateless(matcher: Matcher, matching: MatchingSettings) -> Self {
        Self {
            store: None,
            matcher,
            geocoder: Arc::new(NeighborhoodGeocoder::new()),
            matching,
        }
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/property", web::post().to(match_property))
        .route("/matches/top", web::post().to(top_matches))
        .route("/portfolios/{id}/matches", web::get().to(portfolio_matches))
        .route("/dashboard/top-matches", web::get().to(dashboard_top_matches));
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn store_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ErrorResponse {
        error: "Store unavailable".to_string(),
        message: "No listing database is configured".to_string(),
        status_code: 503,
    })
}

fn store_failed(context: &str, err: StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(what) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: what,
            status_code: 404,
        }),
        err => {
            tracing::error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (status, store) = match &state.store {
        Some(store) => match store.health_check().await {
            Ok(true) => ("healthy", "connected"),
            _ => ("degraded", "unavailable"),
        },
        None => ("healthy", "disabled"),
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score one property against the customers in the request
///
/// POST /api/v1/matches/property
///
/// Request body:
/// ```json
/// {
///   "property": { "status": "for_sale", "type": "apartment", "price": 5000000, ... },
///   "customers": [{ "id": "string", "criteria": { ... } }],
///   "minScore": 50
/// }
/// ```
async fn match_property(
    state: web::Data<AppState>,
    req: web::Json<MatchPropertyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match_property request: {:?}", errors);
        return validation_failed(errors);
    }

    let MatchPropertyRequest { property, customers, min_score } = req.into_inner();
    let total_customers = customers.len();

    let mut matches = state.matcher.match_property(&property, &customers);
    if let Some(min_score) = min_score {
        matches.retain(|m| m.meets(min_score));
    }

    tracing::info!(
        "Returning {} matches for property {} (from {} customers)",
        matches.len(),
        property.id.as_deref().unwrap_or("-"),
        total_customers
    );

    HttpResponse::Ok().json(MatchPropertyResponse {
        property_id: property.id,
        matches,
        total_customers,
    })
}

/// Best property/customer pairs across the properties in the request
///
/// POST /api/v1/matches/top
///
/// Request body:
/// ```json
/// {
///   "properties": [...],
///   "customers": [...],
///   "minScore": 70,
///   "limit": 20
/// }
/// ```
async fn top_matches(
    state: web::Data<AppState>,
    req: web::Json<TopMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let TopMatchesRequest { properties, customers, min_score, limit } = req.into_inner();
    let min_score = min_score.unwrap_or(state.matching.dashboard_min_score);
    let limit = state.matching.clamp_limit(limit);

    run_top_matches(state.matcher.clone(), properties, customers, min_score, limit).await
}

/// Customer suggestions for a stored portfolio
///
/// GET /api/v1/portfolios/{id}/matches?minScore=50
async fn portfolio_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MinScoreQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let Some(store) = &state.store else {
        return store_unavailable();
    };

    let id = match Uuid::parse_str(&path) {
        Ok(id) => id,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid portfolio id".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let (property, customers) = match tokio::try_join!(store.get_portfolio(id), store.list_customers()) {
        Ok(loaded) => loaded,
        Err(e) => return store_failed("Failed to load portfolio matches", e),
    };

    let min_score = query.min_score.unwrap_or(state.matching.detail_min_score);
    let total_customers = customers.len();
    let matches: Vec<_> = state
        .matcher
        .match_property(&property, &customers)
        .into_iter()
        .filter(|m| m.meets(min_score))
        .collect();

    tracing::info!(
        "Portfolio {} has {} customers at or above {} (of {})",
        id,
        matches.len(),
        min_score,
        total_customers
    );

    HttpResponse::Ok().json(MatchPropertyResponse {
        property_id: property.id,
        matches,
        total_customers,
    })
}

/// Dashboard aggregation over stored portfolios and active customers
///
/// GET /api/v1/dashboard/top-matches?limit=20
async fn dashboard_top_matches(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let Some(store) = &state.store else {
        return store_unavailable();
    };

    let (properties, customers) = match tokio::try_join!(store.list_portfolios(), store.list_customers()) {
        Ok(loaded) => loaded,
        Err(e) => return store_failed("Failed to load dashboard data", e),
    };

    let active: Vec<Customer> = customers.into_iter().filter(Customer::is_active).collect();
    let limit = state.matching.clamp_limit(query.limit);

    run_top_matches(
        state.matcher.clone(),
        properties,
        active,
        state.matching.dashboard_min_score,
        limit,
    )
    .await
}

/// Run a batch match off the async workers
async fn run_top_matches(
    matcher: Matcher,
    properties: Vec<crate::models::Property>,
    customers: Vec<Customer>,
    min_score: u8,
    limit: usize,
) -> HttpResponse {
    let total_properties = properties.len();
    let total_customers = customers.len();

    let matches = match web::block(move || {
        matcher.top_matches(&properties, &customers, min_score, limit)
    })
    .await
    {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!("Batch matching failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Batch matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::info!(
        "Returning {} top matches ({} properties x {} customers, min score {})",
        matches.len(),
        total_properties,
        total_customers,
        min_score
    );

    HttpResponse::Ok().json(TopMatchesResponse {
        matches,
        total_properties,
        total_customers,
    })
}
