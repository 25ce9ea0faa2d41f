use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use portfolio_matcher::config::Settings;
use portfolio_matcher::core::{Matcher, NeighborhoodGeocoder};
use portfolio_matcher::routes::{self, AppState};
use portfolio_matcher::services::PostgresClient;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the level and format apply
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting portfolio matching service...");

    // Connect to the listing database (optional - matching works without it)
    let store = match &settings.database.url {
        Some(url) => {
            let client = PostgresClient::from_settings(
                url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!(
                "PostgreSQL client initialized (max: {} connections)",
                settings.database.max_connections.unwrap_or(10)
            );
            Some(Arc::new(client))
        }
        None => {
            warn!("No database configured, stored-portfolio endpoints are disabled");
            None
        }
    };

    // Initialize matcher with configured weights
    let weights = settings.weights();
    if weights.total() != 100 {
        warn!("Scoring weights sum to {}, scores will be clamped to 100", weights.total());
    }
    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    let geocoder = NeighborhoodGeocoder::new().with_extra(
        settings
            .geo
            .neighborhoods
            .iter()
            .map(|(name, [lat, lon])| (name, (*lat, *lon))),
    );

    info!("Geocoder initialized with {} neighborhoods", geocoder.len());

    // Build application state
    let app_state = AppState {
        store,
        matcher,
        geocoder: Arc::new(geocoder),
        matching: settings.matching,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
