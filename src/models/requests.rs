use crate::models::domain::{Coordinates, RiderProfile};
use crate::models::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to resolve the station nearest to the rider
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearestStationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(rename = "maxDistanceKm", alias = "max_distance_km", default)]
    pub max_distance_km: Option<f64>,
}

/// Request for the departure times between two stations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailableTimesRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "departureStation", alias = "departure_station")]
    pub departure_station: String,
    #[validate(length(min = 1))]
    #[serde(rename = "arrivalStation", alias = "arrival_station")]
    pub arrival_station: String,
    #[serde(default)]
    pub date: Option<chrono::NaiveDate>,
}

/// Request for the trip details of a chosen departure
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TripDetailsRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "departureStation", alias = "departure_station")]
    pub departure_station: String,
    #[validate(length(min = 1))]
    #[serde(rename = "arrivalStation", alias = "arrival_station")]
    pub arrival_station: String,
    #[serde(rename = "departureTime", alias = "departure_time")]
    pub departure_time: TimeSlot,
    #[serde(default)]
    pub date: Option<chrono::NaiveDate>,
}

/// Request to find study partners
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
    #[serde(rename = "selectedTopics", alias = "selected_topics", default)]
    pub selected_topics: Vec<String>,
    #[validate(length(min = 1))]
    #[serde(rename = "departureStation", alias = "departure_station")]
    pub departure_station: String,
    #[validate(length(min = 1))]
    #[serde(rename = "arrivalStation", alias = "arrival_station")]
    pub arrival_station: String,
    #[serde(rename = "departureTime", alias = "departure_time")]
    pub departure_time: TimeSlot,
    #[serde(rename = "currentCoordinates", alias = "current_coordinates", default)]
    pub current_coordinates: Option<Coordinates>,
    #[serde(default)]
    pub limit: Option<u16>,
}

impl FindMatchesRequest {
    pub fn to_rider(&self) -> RiderProfile {
        RiderProfile {
            id: self.user_id.clone(),
            selected_topics: self.selected_topics.iter().cloned().collect(),
            departure_station: self.departure_station.clone(),
            arrival_station: self.arrival_station.clone(),
            departure_time: self.departure_time,
            current_coordinates: self.current_coordinates,
        }
    }
}

/// Request to rate a finished session.
///
/// The rating range is enforced by the match engine, not here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateMatchRequest {
    pub rating: i64,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Query string for the station listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationsQuery {
    pub region: Option<String>,
}
