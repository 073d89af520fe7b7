use crate::core::schedule::available_times;
use crate::models::{Station, TimeSlot};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// In-process cache of generated timetables
///
/// Generation is cheap but the same station pair is requested over and over
/// while riders browse, so results are kept per (departure, arrival, date).
#[derive(Clone)]
pub struct ScheduleCache {
    cache: moka::future::Cache<String, Arc<Vec<TimeSlot>>>,
}

impl ScheduleCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Cached departure times, generating them on a miss.
    ///
    /// Concurrent misses for the same key share a single generation.
    pub async fn available_times(
        &self,
        departure: &Station,
        arrival: &Station,
        date: NaiveDate,
    ) -> Arc<Vec<TimeSlot>> {
        let key = CacheKey::schedule(&departure.id, &arrival.id, date);

        self.cache
            .get_with(key, async {
                tracing::trace!("Schedule cache miss: {} -> {} on {}", departure.id, arrival.id, date);
                Arc::new(available_times(departure, arrival, date))
            })
            .await
    }

    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Flush moka's pending housekeeping so `entry_count` is current
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a station pair timetable
    pub fn schedule(departure_id: &str, arrival_id: &str, date: NaiveDate) -> String {
        format!("schedule:{}:{}:{}", departure_id, arrival_id, date)
    }
}
