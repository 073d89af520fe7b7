// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod time_slot;

pub use domain::{
    CandidateInput, Coordinates, MatchCandidate, MatchRating, RatingAck, Region, RiderProfile,
    ScoringPolicy, Station, Topic, TrainTrip,
};
pub use requests::{
    AvailableTimesRequest, FindMatchesRequest, NearestStationRequest, RateMatchRequest,
    StationsQuery, TripDetailsRequest,
};
pub use responses::{
    AvailableTimesResponse, ErrorResponse, FindMatchesResponse, HealthResponse,
    NearestStationResponse,
};
pub use time_slot::{TimeSlot, TimeSlotError};
