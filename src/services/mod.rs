// Service exports
pub mod cache;
pub mod candidates;
pub mod catalog;
pub mod ratings;

pub use cache::{CacheKey, ScheduleCache};
pub use candidates::{CandidateSource, CandidateSourceError, DemoCandidateSource, RemoteCandidateSource};
pub use catalog::{CatalogError, ReferenceCatalog};
pub use ratings::{LoggingRatingSink, RatingError, RatingSink, RemoteRatingSink};
