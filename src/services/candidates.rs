use crate::models::{CandidateInput, RiderProfile};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while sourcing a candidate pool
#[derive(Debug, Error)]
pub enum CandidateSourceError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Supplies the riders a match request is ranked against
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn candidate_pool(
        &self,
        rider: &RiderProfile,
    ) -> Result<Vec<CandidateInput>, CandidateSourceError>;

    /// Short label for logs and health output
    fn name(&self) -> &'static str;
}

const NICKNAMES: &[&str] = &[
    "אברהם כהן",
    "יצחק לוי",
    "יעקב ישראלי",
    "משה פרידמן",
    "דוד אברמוב",
    "שמואל ביטון",
    "אהרן גולדברג",
    "יוסף מזרחי",
    "בנימין שטרן",
    "נחום רוזן",
];

/// Seeded demo pool standing in for a rider directory.
///
/// Every candidate rides the rider's route at the rider's time and shares a
/// random non-empty subset of the rider's topics. Output is fully determined
/// by the seed and the rider id.
#[derive(Debug, Clone)]
pub struct DemoCandidateSource {
    seed: u64,
    pool_size: usize,
    simulated_delay: Duration,
    extra_topics: Vec<String>,
}

impl DemoCandidateSource {
    pub fn new(seed: u64, pool_size: usize) -> Self {
        Self {
            seed,
            pool_size,
            simulated_delay: Duration::ZERO,
            extra_topics: Vec::new(),
        }
    }

    /// Sleep this long before answering, to mimic a network round trip
    pub fn with_simulated_delay(mut self, delay: Duration) -> Self {
        self.simulated_delay = delay;
        self
    }

    /// Topics candidates may hold beyond the rider's own
    pub fn with_extra_topics(mut self, topics: Vec<String>) -> Self {
        self.extra_topics = topics;
        self
    }

    fn rider_seed(&self, rider: &RiderProfile) -> u64 {
        rider
            .id
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
    }

    /// Build the pool synchronously
    pub fn generate(&self, rider: &RiderProfile) -> Vec<CandidateInput> {
        let mut rng = StdRng::seed_from_u64(self.rider_seed(rider));
        let rider_topics: Vec<&String> = rider.selected_topics.iter().collect();

        (0..self.pool_size)
            .map(|i| {
                let mut topics: Vec<String> = if rider_topics.is_empty() {
                    Vec::new()
                } else {
                    let count = rng.gen_range(1..=rider_topics.len());
                    rider_topics
                        .choose_multiple(&mut rng, count)
                        .map(|t| t.to_string())
                        .collect()
                };

                if rng.gen_bool(0.3) {
                    if let Some(extra) = self.extra_topics.choose(&mut rng) {
                        topics.push(extra.clone());
                    }
                }

                let distance_km = (rng.gen_range(0.2..8.0_f64) * 10.0).round() / 10.0;
                let nickname = NICKNAMES[i % NICKNAMES.len()];

                CandidateInput {
                    id: format!("match{}", i + 1),
                    nickname: Some(nickname.to_string()),
                    topics: topics.into_iter().collect(),
                    departure_station: rider.departure_station.clone(),
                    arrival_station: rider.arrival_station.clone(),
                    departure_time: rider.departure_time,
                    coordinates: None,
                    distance_km: Some(distance_km),
                }
            })
            .collect()
    }
}

#[async_trait]
impl CandidateSource for DemoCandidateSource {
    async fn candidate_pool(
        &self,
        rider: &RiderProfile,
    ) -> Result<Vec<CandidateInput>, CandidateSourceError> {
        if !self.simulated_delay.is_zero() {
            tokio::time::sleep(self.simulated_delay).await;
        }

        let pool = self.generate(rider);
        tracing::debug!("Demo source generated {} candidates for {}", pool.len(), rider.id);
        Ok(pool)
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

/// Rider directory reached over HTTP
///
/// Expects `GET {endpoint}/candidates?riderId=..&departure=..&arrival=..&time=..`
/// to answer `{"candidates": [CandidateInput, ...]}`.
pub struct RemoteCandidateSource {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl RemoteCandidateSource {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CandidateSourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl CandidateSource for RemoteCandidateSource {
    async fn candidate_pool(
        &self,
        rider: &RiderProfile,
    ) -> Result<Vec<CandidateInput>, CandidateSourceError> {
        let url = format!(
            "{}/candidates?riderId={}&departure={}&arrival={}&time={}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&rider.id),
            urlencoding::encode(&rider.departure_station),
            urlencoding::encode(&rider.arrival_station),
            urlencoding::encode(&rider.departure_time.to_string()),
        );

        tracing::debug!("Fetching candidates from: {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(CandidateSourceError::ApiError(format!(
                "Failed to fetch candidates: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let entries = json
            .get("candidates")
            .and_then(|c| c.as_array())
            .ok_or_else(|| CandidateSourceError::InvalidResponse("Missing candidates array".into()))?;

        let pool: Vec<CandidateInput> = entries
            .iter()
            .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::warn!("Skipping malformed candidate: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} of {} candidates", pool.len(), entries.len());

        Ok(pool)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlot;

    fn create_rider(topics: &[&str]) -> RiderProfile {
        RiderProfile {
            id: "rider-1".to_string(),
            selected_topics: topics.iter().map(|s| s.to_string()).collect(),
            departure_station: "lod".to_string(),
            arrival_station: "jerusalem-malha".to_string(),
            departure_time: TimeSlot::new(8, 0).unwrap(),
            current_coordinates: None,
        }
    }

    #[test]
    fn test_demo_pool_is_deterministic() {
        let source = DemoCandidateSource::new(42, 5);
        let rider = create_rider(&["talmud", "halacha", "mishna"]);

        let first = tokio_test::block_on(source.candidate_pool(&rider)).unwrap();
        let second = tokio_test::block_on(source.candidate_pool(&rider)).unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_demo_pool_shares_rider_route_and_topics() {
        let source = DemoCandidateSource::new(7, 10).with_extra_topics(vec!["general".to_string()]);
        let rider = create_rider(&["talmud", "halacha"]);

        for candidate in source.generate(&rider) {
            assert_eq!(candidate.departure_station, "lod");
            assert_eq!(candidate.arrival_station, "jerusalem-malha");
            assert_eq!(candidate.departure_time, rider.departure_time);
            assert!(candidate
                .topics
                .iter()
                .any(|t| rider.selected_topics.contains(t)));
            assert!(candidate
                .topics
                .iter()
                .all(|t| rider.selected_topics.contains(t) || t == "general"));
            let distance = candidate.distance_km.unwrap();
            assert!((0.2..=8.0).contains(&distance));
        }
    }

    #[test]
    fn test_demo_pool_for_rider_without_topics() {
        let source = DemoCandidateSource::new(1, 3);
        let pool = source.generate(&create_rider(&[]));
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|c| c.topics.is_empty()));
    }

    #[tokio::test]
    async fn test_remote_source_parses_candidates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/candidates")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("riderId".into(), "rider-1".into()),
                mockito::Matcher::UrlEncoded("time".into(), "08:00".into()),
            ]))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates": [
                    {"id": "c1", "topics": ["talmud"], "departureStation": "lod",
                     "arrivalStation": "jerusalem-malha", "departureTime": "08:00", "distanceKm": 2.5},
                    {"id": "broken", "departureTime": "not-a-time"}
                ]}"#,
            )
            .create_async()
            .await;

        let source = RemoteCandidateSource::new(
            server.url(),
            Some("secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let pool = source.candidate_pool(&create_rider(&["talmud"])).await.unwrap();

        mock.assert_async().await;
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, "c1");
        assert_eq!(pool[0].distance_km, Some(2.5));
    }

    #[tokio::test]
    async fn test_remote_source_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let source = RemoteCandidateSource::new(server.url(), None, Duration::from_secs(5)).unwrap();
        let result = source.candidate_pool(&create_rider(&["talmud"])).await;

        assert!(matches!(result, Err(CandidateSourceError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_remote_source_missing_array() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"riders": []}"#)
            .create_async()
            .await;

        let source = RemoteCandidateSource::new(server.url(), None, Duration::from_secs(5)).unwrap();
        let result = source.candidate_pool(&create_rider(&["talmud"])).await;

        assert!(matches!(result, Err(CandidateSourceError::InvalidResponse(_))));
    }
}
