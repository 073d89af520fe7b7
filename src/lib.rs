//! Chavruta Match - station, schedule and study-partner matching for train commuters
//!
//! The core is three pure components: nearest-station resolution, timetable
//! generation with regional frequency rules, and topic-overlap compatibility
//! ranking. The `routes` and `services` modules wrap them in an HTTP API with
//! pluggable candidate and rating collaborators.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{available_times, find_nearest_station, haversine_distance, CoreError, MatchEngine};
pub use models::{CandidateInput, MatchCandidate, RiderProfile, ScoringPolicy, Station, TimeSlot, Topic};
