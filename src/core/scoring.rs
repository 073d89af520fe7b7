use crate::core::error::CoreError;
use crate::models::ScoringPolicy;
use std::collections::BTreeSet;

/// Topics a candidate shares with the rider
pub fn shared_topics(rider_topics: &BTreeSet<String>, candidate_topics: &BTreeSet<String>) -> BTreeSet<String> {
    rider_topics.intersection(candidate_topics).cloned().collect()
}

/// Calculate a compatibility score (0-100)
///
/// Scoring formula:
/// score = round(min(100, floor + (shared / rider_topics) * (100 - floor)))
///
/// A candidate sharing every rider topic scores 100; one sharing none scores
/// the floor.
pub fn compatibility_score(
    shared_count: usize,
    rider_topic_count: usize,
    policy: &ScoringPolicy,
) -> Result<u8, CoreError> {
    if rider_topic_count == 0 {
        return Err(CoreError::invalid("rider must select at least one topic"));
    }
    if policy.base_floor > 100 {
        return Err(CoreError::invalid(format!(
            "scoring floor must be at most 100, got {}",
            policy.base_floor
        )));
    }

    let floor = policy.base_floor as f64;
    let ratio = shared_count as f64 / rider_topic_count as f64;
    let score = (floor + ratio * (100.0 - floor)).min(100.0).round();

    Ok(score as u8)
}
