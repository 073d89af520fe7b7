use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchCandidate, Station};
use crate::models::time_slot::TimeSlot;

/// Response for the nearest station endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestStationResponse {
    pub station: Option<Station>,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "maxDistanceKm")]
    pub max_distance_km: f64,
}

/// Response for the available times endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTimesResponse {
    #[serde(rename = "departureStation")]
    pub departure_station: String,
    #[serde(rename = "arrivalStation")]
    pub arrival_station: String,
    pub date: chrono::NaiveDate,
    pub times: Vec<TimeSlot>,
}

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub stations: usize,
    pub topics: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
