use crate::models::{FindMatchesRequest, FindMatchesResponse, RateMatchRequest};
use crate::routes::{
    core_error_response, error_json, resolve_route, validation_error_response, AppState,
};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/{match_id}/rate", web::post().to(rate_match));
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "selectedTopics": ["talmud", "halacha"],
///   "departureStation": "lod",
///   "arrivalStation": "jerusalem-malha",
///   "departureTime": "07:20",
///   "currentCoordinates": { "lat": 31.94, "lng": 34.87 },
///   "limit": 10
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return validation_error_response(errors);
    }

    if let Err(response) = resolve_route(&state.catalog, &req.departure_station, &req.arrival_station) {
        return response;
    }

    let unknown = state.catalog.unknown_topics(&req.selected_topics);
    if !unknown.is_empty() {
        return error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Unknown topics: {}", unknown.join(", ")),
        );
    }

    let rider = req.to_rider();
    let limit = req
        .limit
        .unwrap_or_else(|| state.matching.default_limit())
        .min(state.matching.max_limit()) as usize;

    tracing::info!("Finding matches for rider: {}, limit: {}", rider.id, limit);

    let pool = match state.candidates.candidate_pool(&rider).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(
                "Failed to fetch candidates for {} from {} source: {}",
                rider.id,
                state.candidates.name(),
                e
            );
            return error_json(StatusCode::BAD_GATEWAY, "candidate_source_failed", e.to_string());
        }
    };

    let total_candidates = pool.len();

    let mut matches = match state.engine.find_matches(&rider, pool) {
        Ok(matches) => matches,
        Err(e) => return core_error_response(e),
    };
    matches.truncate(limit);

    tracing::info!(
        "Returning {} matches for rider {} (from {} candidates)",
        matches.len(),
        rider.id,
        total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_candidates,
    })
}

/// Rate a finished study session
///
/// POST /api/v1/matches/{matchId}/rate
///
/// Request body:
/// ```json
/// { "rating": 5, "feedback": "string" }
/// ```
async fn rate_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<RateMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }

    let match_id = path.into_inner();
    let req = req.into_inner();

    let rating = match state.engine.rate_match(&match_id, req.rating, req.feedback) {
        Ok(rating) => rating,
        Err(e) => return core_error_response(e),
    };

    match state.ratings.submit(rating).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            tracing::error!(
                "Failed to forward rating for {} to {} sink: {}",
                match_id,
                state.ratings.name(),
                e
            );
            error_json(StatusCode::BAD_GATEWAY, "rating_failed", e.to_string())
        }
    }
}
