use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{haversine_distance, NeighborhoodGeocoder, UNKNOWN_ID};
use crate::models::{ErrorResponse, MapMarker, MapMarkersRequest, MapMarkersResponse, Property};
use crate::routes::matches::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/map/markers", web::post().to(markers));
}

/// Place listings on the map by neighborhood
///
/// Listings without a neighborhood are skipped. With a `center`, every marker
/// carries its distance from it, and `radiusKm` drops markers further away.
pub fn build_markers(
    geocoder: &NeighborhoodGeocoder,
    properties: &[Property],
    center: Option<&str>,
    radius_km: Option<f64>,
) -> Vec<MapMarker> {
    let origin = center.map(|name| geocoder.coordinates_for(name));

    properties
        .iter()
        .filter_map(|property| {
            let neighborhood = property.neighborhood()?;
            let (latitude, longitude) = geocoder.coordinates_for(neighborhood);
            let distance_km = origin.map(|(lat, lon)| haversine_distance(lat, lon, latitude, longitude));

            if let (Some(distance), Some(radius)) = (distance_km, radius_km) {
                if distance > radius {
                    return None;
                }
            }

            Some(MapMarker {
                property_id: property.id.clone().unwrap_or_else(|| UNKNOWN_ID.to_string()),
                title: property.title.clone(),
                neighborhood: neighborhood.to_string(),
                latitude,
                longitude,
                distance_km,
            })
        })
        .collect()
}

/// POST /api/v1/map/markers
async fn markers(
    state: web::Data<AppState>,
    req: web::Json<MapMarkersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let markers = build_markers(
        &state.geocoder,
        &req.properties,
        req.center.as_deref(),
        req.radius_km,
    );

    tracing::debug!("Placed {} of {} listings on the map", markers.len(), req.properties.len());

    HttpResponse::Ok().json(MapMarkersResponse { markers })
}
