use crate::core::{nearest_station_with_distance, schedule::trip_details};
use crate::models::{
    AvailableTimesRequest, AvailableTimesResponse, HealthResponse, NearestStationRequest,
    NearestStationResponse, Region, StationsQuery, TripDetailsRequest,
};
use crate::routes::{
    core_error_response, error_json, resolve_route, validation_error_response, AppState,
};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

/// Configure reference data, geolocation and schedule routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/stations", web::get().to(list_stations))
        .route("/stations/nearest", web::post().to(nearest_station))
        .route("/topics", web::get().to(list_topics))
        .route("/schedule/times", web::post().to(available_times))
        .route("/schedule/trip", web::post().to(trip));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        stations: state.catalog.stations().len(),
        topics: state.catalog.topics().len(),
    })
}

/// Station catalog
///
/// GET /api/v1/stations?region=jerusalem
async fn list_stations(
    state: web::Data<AppState>,
    query: web::Query<StationsQuery>,
) -> impl Responder {
    match &query.region {
        None => HttpResponse::Ok().json(state.catalog.stations()),
        Some(raw) => match raw.parse::<Region>() {
            Ok(region) => HttpResponse::Ok().json(state.catalog.stations_in_region(region)),
            Err(message) => error_json(StatusCode::BAD_REQUEST, "invalid_region", message),
        },
    }
}

/// Topic catalog
async fn list_topics(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.topics())
}

/// Nearest station endpoint
///
/// POST /api/v1/stations/nearest
///
/// Request body:
/// ```json
/// { "latitude": 32.08, "longitude": 34.80, "maxDistanceKm": 10 }
/// ```
///
/// A rider with no station in range gets `"station": null`, not an error.
async fn nearest_station(
    state: web::Data<AppState>,
    req: web::Json<NearestStationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }

    let max_distance_km = req
        .max_distance_km
        .unwrap_or_else(|| state.matching.max_distance_km());

    match nearest_station_with_distance(
        req.latitude,
        req.longitude,
        state.catalog.stations(),
        max_distance_km,
    ) {
        Ok(nearest) => {
            tracing::info!(
                "Nearest station lookup at ({}, {}): {}",
                req.latitude,
                req.longitude,
                nearest.map(|n| n.station.id.as_str()).unwrap_or("none")
            );

            HttpResponse::Ok().json(NearestStationResponse {
                station: nearest.map(|n| n.station.clone()),
                distance_km: nearest.map(|n| n.distance_km),
                max_distance_km,
            })
        }
        Err(e) => core_error_response(e),
    }
}

/// Available departure times
///
/// POST /api/v1/schedule/times
///
/// Request body:
/// ```json
/// { "departureStation": "lod", "arrivalStation": "jerusalem-malha", "date": "2024-03-10" }
/// ```
async fn available_times(
    state: web::Data<AppState>,
    req: web::Json<AvailableTimesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }

    let (departure, arrival) =
        match resolve_route(&state.catalog, &req.departure_station, &req.arrival_station) {
            Ok(route) => route,
            Err(response) => return response,
        };

    let date = req.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let times = state.schedules.available_times(departure, arrival, date).await;

    tracing::info!(
        "Returning {} departures from {} to {} on {}",
        times.len(),
        departure.id,
        arrival.id,
        date
    );

    HttpResponse::Ok().json(AvailableTimesResponse {
        departure_station: departure.id.clone(),
        arrival_station: arrival.id.clone(),
        date,
        times: times.as_ref().clone(),
    })
}

/// Trip details for a chosen departure
///
/// POST /api/v1/schedule/trip
///
/// The departure time must be one of the times offered for the route.
async fn trip(
    state: web::Data<AppState>,
    req: web::Json<TripDetailsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }

    let (departure, arrival) =
        match resolve_route(&state.catalog, &req.departure_station, &req.arrival_station) {
            Ok(route) => route,
            Err(response) => return response,
        };

    let date = req.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let times = state.schedules.available_times(departure, arrival, date).await;

    if !times.contains(&req.departure_time) {
        return error_json(
            StatusCode::BAD_REQUEST,
            "unavailable_time",
            format!(
                "No departure at {} from {} to {}",
                req.departure_time, departure.id, arrival.id
            ),
        );
    }

    let trip = trip_details(departure, arrival, req.departure_time, date, &mut rand::thread_rng());

    HttpResponse::Ok().json(trip)
}
