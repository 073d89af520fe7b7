// Core algorithm exports
pub mod distance;
pub mod error;
pub mod geo;
pub mod matcher;
pub mod schedule;
pub mod scoring;

pub use distance::{distance_between, haversine_distance};
pub use error::CoreError;
pub use geo::{find_nearest_station, nearest_station_with_distance, NearestStation, DEFAULT_MAX_DISTANCE_KM};
pub use matcher::MatchEngine;
pub use schedule::{available_times, trip_details};
pub use scoring::compatibility_score;
