// Route exports
pub mod matches;
pub mod planning;

use crate::config::MatchingSettings;
use crate::core::{CoreError, MatchEngine};
use crate::models::{ErrorResponse, Station};
use crate::services::{CandidateSource, RatingSink, ReferenceCatalog, ScheduleCache};
use actix_web::{error, http::StatusCode, web, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ReferenceCatalog>,
    pub engine: MatchEngine,
    pub schedules: ScheduleCache,
    pub candidates: Arc<dyn CandidateSource>,
    pub ratings: Arc<dyn RatingSink>,
    pub matching: MatchingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(planning::configure)
            .configure(matches::configure),
    );
}

/// JSON extractor config with the API's error shape
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

/// Query extractor config with the API's error shape
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(handle_query_payload_error)
}

/// Extractor rejection rendered with the API's error body
#[derive(Debug)]
pub struct JsonError {
    pub error: &'static str,
    pub message: String,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        error_json(self.status_code(), self.error, self.message.clone())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json",
        message: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query",
        message: format!("Invalid query: {}", err),
    }
    .into()
}

/// Build an error body with the given status
pub(crate) fn error_json(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn core_error_response(err: CoreError) -> HttpResponse {
    match err {
        CoreError::InvalidInput(message) => error_json(StatusCode::BAD_REQUEST, "invalid_input", message),
    }
}

pub(crate) fn validation_error_response(errors: validator::ValidationErrors) -> HttpResponse {
    error_json(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string())
}

/// Look up both ends of a trip, rejecting unknown or identical stations
pub(crate) fn resolve_route<'a>(
    catalog: &'a ReferenceCatalog,
    departure_id: &str,
    arrival_id: &str,
) -> Result<(&'a Station, &'a Station), HttpResponse> {
    let departure = catalog.station(departure_id).ok_or_else(|| {
        error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Unknown departure station: {}", departure_id),
        )
    })?;
    let arrival = catalog.station(arrival_id).ok_or_else(|| {
        error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Unknown arrival station: {}", arrival_id),
        )
    })?;

    if departure.id == arrival.id {
        return Err(error_json(
            StatusCode::BAD_REQUEST,
            "same_station",
            "Departure and arrival stations must differ",
        ));
    }

    Ok((departure, arrival))
}
