use crate::models::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Rail network region a station belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    North,
    Center,
    South,
    Jerusalem,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "north",
            Region::Center => "center",
            Region::South => "south",
            Region::Jerusalem => "jerusalem",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north" => Ok(Region::North),
            "center" => Ok(Region::Center),
            "south" => Ok(Region::South),
            "jerusalem" => Ok(Region::Jerusalem),
            other => Err(format!("unknown region: {}", other)),
        }
    }
}

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Train station reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub region: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Station {
    pub fn new(id: &str, name: &str, region: Region, coordinates: Option<Coordinates>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            region,
            coordinates,
        }
    }
}

/// Study topic reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// A rider's planning state for one session.
///
/// Passed explicitly into every matching call; nothing in the crate keeps a
/// "current rider".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderProfile {
    pub id: String,
    #[serde(rename = "selectedTopics")]
    pub selected_topics: BTreeSet<String>,
    #[serde(rename = "departureStation")]
    pub departure_station: String,
    #[serde(rename = "arrivalStation")]
    pub arrival_station: String,
    #[serde(rename = "departureTime")]
    pub departure_time: TimeSlot,
    #[serde(rename = "currentCoordinates", default)]
    pub current_coordinates: Option<Coordinates>,
}

/// One entry of a candidate pool, as supplied by a candidate source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInput {
    pub id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(rename = "departureStation")]
    pub departure_station: String,
    #[serde(rename = "arrivalStation")]
    pub arrival_station: String,
    #[serde(rename = "departureTime")]
    pub departure_time: TimeSlot,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(rename = "distanceKm", default)]
    pub distance_km: Option<f64>,
}

/// Ranked match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "sharedTopics")]
    pub shared_topics: BTreeSet<String>,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
    #[serde(rename = "distanceKm", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(rename = "departureStation")]
    pub departure_station: String,
    #[serde(rename = "arrivalStation")]
    pub arrival_station: String,
    #[serde(rename = "departureTime")]
    pub departure_time: TimeSlot,
}

/// Validated rating of a finished study session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRating {
    #[serde(rename = "matchId")]
    pub match_id: String,
    pub rating: u8,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Acknowledgment returned by a rating sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingAck {
    #[serde(rename = "matchId")]
    pub match_id: String,
    #[serde(rename = "ratingId")]
    pub rating_id: String,
    pub accepted: bool,
    #[serde(rename = "recordedAt")]
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Details of one departure between two stations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainTrip {
    #[serde(rename = "departureStationId")]
    pub departure_station_id: String,
    #[serde(rename = "arrivalStationId")]
    pub arrival_station_id: String,
    #[serde(rename = "departureTime")]
    pub departure_time: TimeSlot,
    #[serde(rename = "arrivalTime")]
    pub arrival_time: TimeSlot,
    pub date: chrono::NaiveDate,
    #[serde(rename = "travelMinutes")]
    pub travel_minutes: u32,
    #[serde(rename = "trainNumber")]
    pub train_number: String,
}

/// Compatibility scoring policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    /// Score awarded to a candidate sharing no topics; full overlap scores 100
    pub base_floor: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self { base_floor: 60 }
    }
}
