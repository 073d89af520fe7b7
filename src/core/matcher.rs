use crate::core::{
    distance::distance_between,
    error::CoreError,
    scoring::{compatibility_score, shared_topics},
};
use crate::models::{CandidateInput, MatchCandidate, MatchRating, RiderProfile, ScoringPolicy};
use std::cmp::Ordering;

/// Accepted rating range, inclusive
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Ranks study partners for a rider
///
/// The engine only ranks the pool it is handed; where candidates come from is
/// the business of a `CandidateSource`.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    policy: ScoringPolicy,
}

impl MatchEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: ScoringPolicy::default(),
        }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score and rank a candidate pool for a rider
    ///
    /// # Returns
    /// Candidates sorted by score (descending), then by distance (ascending,
    /// unknown distance last). Remaining ties keep pool order.
    ///
    /// # Errors
    /// `InvalidInput` when the rider has no topics selected.
    pub fn find_matches(
        &self,
        rider: &RiderProfile,
        candidates: Vec<CandidateInput>,
    ) -> Result<Vec<MatchCandidate>, CoreError> {
        let rider_topic_count = rider.selected_topics.len();
        if rider_topic_count == 0 {
            return Err(CoreError::invalid("rider must select at least one topic"));
        }

        let total_candidates = candidates.len();

        let mut matches = candidates
            .into_iter()
            // Never match a rider with themselves
            .filter(|candidate| candidate.id != rider.id)
            .map(|candidate| self.score_candidate(rider, candidate))
            .collect::<Result<Vec<_>, _>>()?;

        matches.sort_by(compare_matches);

        tracing::debug!(
            "Ranked {} of {} candidates for rider {}",
            matches.len(),
            total_candidates,
            rider.id
        );

        Ok(matches)
    }

    fn score_candidate(
        &self,
        rider: &RiderProfile,
        candidate: CandidateInput,
    ) -> Result<MatchCandidate, CoreError> {
        let shared = shared_topics(&rider.selected_topics, &candidate.topics);
        let score = compatibility_score(shared.len(), rider.selected_topics.len(), &self.policy)?;

        let distance_km = candidate.distance_km.or_else(|| {
            match (rider.current_coordinates, candidate.coordinates) {
                (Some(a), Some(b)) => Some(distance_between(&a, &b)),
                _ => None,
            }
        });

        Ok(MatchCandidate {
            id: candidate.id,
            nickname: candidate.nickname,
            shared_topics: shared,
            compatibility_score: score,
            distance_km,
            departure_station: candidate.departure_station,
            arrival_station: candidate.arrival_station,
            departure_time: candidate.departure_time,
        })
    }

    /// Validate a session rating before it is handed to a rating sink
    pub fn rate_match(
        &self,
        match_id: &str,
        rating: i64,
        feedback: Option<String>,
    ) -> Result<MatchRating, CoreError> {
        if match_id.trim().is_empty() {
            return Err(CoreError::invalid("match id must not be empty"));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(CoreError::invalid(format!(
                "rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, rating
            )));
        }

        Ok(MatchRating {
            match_id: match_id.to_string(),
            rating: rating as u8,
            feedback: feedback.filter(|f| !f.trim().is_empty()),
        })
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

/// Score descending, then known distance ascending, unknown distance last
fn compare_matches(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.compatibility_score
        .cmp(&a.compatibility_score)
        .then_with(|| match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, TimeSlot};
    use std::collections::BTreeSet;

    fn topics(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn create_rider(topic_ids: &[&str]) -> RiderProfile {
        RiderProfile {
            id: "current_rider".to_string(),
            selected_topics: topics(topic_ids),
            departure_station: "tel-aviv-savidor-center".to_string(),
            arrival_station: "jerusalem-yitzhak-navon".to_string(),
            departure_time: TimeSlot::new(7, 20).unwrap(),
            current_coordinates: None,
        }
    }

    fn create_candidate(id: &str, topic_ids: &[&str], distance_km: Option<f64>) -> CandidateInput {
        CandidateInput {
            id: id.to_string(),
            nickname: Some(format!("Rider {}", id)),
            topics: topics(topic_ids),
            departure_station: "tel-aviv-savidor-center".to_string(),
            arrival_station: "jerusalem-yitzhak-navon".to_string(),
            departure_time: TimeSlot::new(7, 20).unwrap(),
            coordinates: None,
            distance_km,
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let engine = MatchEngine::with_default_policy();
        let rider = create_rider(&["talmud", "halacha"]);

        let matches = engine
            .find_matches(&rider, vec![create_candidate("1", &["talmud"], None)])
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].compatibility_score, 80);
        assert_eq!(matches[0].shared_topics, topics(&["talmud"]));
    }

    #[test]
    fn test_matches_sorted_by_score() {
        let engine = MatchEngine::with_default_policy();
        let rider = create_rider(&["talmud", "halacha", "mishna", "chumash"]);

        let candidates = vec![
            create_candidate("low", &["general"], None),
            create_candidate("mid", &["talmud", "halacha"], None),
            create_candidate("full", &["talmud", "halacha", "mishna", "chumash"], None),
        ];

        let matches = engine.find_matches(&rider, candidates).unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["full", "mid", "low"]);
        assert_eq!(matches[0].compatibility_score, 100);
        assert_eq!(matches[2].compatibility_score, 60);
    }

    #[test]
    fn test_ties_broken_by_distance_with_unknown_last() {
        let engine = MatchEngine::with_default_policy();
        let rider = create_rider(&["talmud"]);

        let candidates = vec![
            create_candidate("unknown", &["talmud"], None),
            create_candidate("far", &["talmud"], Some(12.0)),
            create_candidate("near", &["talmud"], Some(1.5)),
        ];

        let matches = engine.find_matches(&rider, candidates).unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far", "unknown"]);
    }

    #[test]
    fn test_distance_computed_from_coordinates() {
        let engine = MatchEngine::with_default_policy();
        let mut rider = create_rider(&["talmud"]);
        rider.current_coordinates = Some(Coordinates::new(32.08, 34.80));

        let mut candidate = create_candidate("1", &["talmud"], None);
        candidate.coordinates = Some(Coordinates::new(32.16, 34.83));

        let matches = engine.find_matches(&rider, vec![candidate]).unwrap();
        let distance = matches[0].distance_km.unwrap();
        assert!(distance > 9.0 && distance < 9.6, "got {}", distance);
    }

    #[test]
    fn test_supplied_distance_wins_over_coordinates() {
        let engine = MatchEngine::with_default_policy();
        let mut rider = create_rider(&["talmud"]);
        rider.current_coordinates = Some(Coordinates::new(32.08, 34.80));

        let mut candidate = create_candidate("1", &["talmud"], Some(3.0));
        candidate.coordinates = Some(Coordinates::new(32.16, 34.83));

        let matches = engine.find_matches(&rider, vec![candidate]).unwrap();
        assert_eq!(matches[0].distance_km, Some(3.0));
    }

    #[test]
    fn test_excludes_self() {
        let engine = MatchEngine::with_default_policy();
        let rider = create_rider(&["talmud"]);

        let candidates = vec![
            create_candidate("current_rider", &["talmud"], None),
            create_candidate("other", &["talmud"], None),
        ];

        let matches = engine.find_matches(&rider, candidates).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "other");
    }

    #[test]
    fn test_zero_topics_is_invalid() {
        let engine = MatchEngine::with_default_policy();
        let rider = create_rider(&[]);

        let result = engine.find_matches(&rider, vec![create_candidate("1", &["talmud"], None)]);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));

        // Empty pools are still rejected for a rider without topics
        assert!(engine.find_matches(&rider, vec![]).is_err());
    }

    #[test]
    fn test_empty_pool() {
        let engine = MatchEngine::with_default_policy();
        let rider = create_rider(&["talmud"]);
        assert!(engine.find_matches(&rider, vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_identical_inputs_identical_scores() {
        let engine = MatchEngine::with_default_policy();
        let rider = create_rider(&["talmud", "halacha", "mishna"]);
        let pool = vec![
            create_candidate("a", &["talmud"], Some(2.0)),
            create_candidate("b", &["mishna", "halacha"], None),
        ];

        let first = engine.find_matches(&rider, pool.clone()).unwrap();
        let second = engine.find_matches(&rider, pool).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rate_match_bounds() {
        let engine = MatchEngine::with_default_policy();

        let rating = engine.rate_match("match1", 5, Some("great".to_string())).unwrap();
        assert_eq!(rating.rating, 5);
        assert_eq!(rating.feedback.as_deref(), Some("great"));

        assert!(engine.rate_match("match1", 1, None).is_ok());
        assert!(matches!(engine.rate_match("match1", 0, None), Err(CoreError::InvalidInput(_))));
        assert!(matches!(engine.rate_match("match1", 6, None), Err(CoreError::InvalidInput(_))));
        assert!(engine.rate_match("  ", 3, None).is_err());
    }

    #[test]
    fn test_rate_match_drops_blank_feedback() {
        let engine = MatchEngine::default();
        let rating = engine.rate_match("match1", 4, Some("   ".to_string())).unwrap();
        assert!(rating.feedback.is_none());
    }
}
