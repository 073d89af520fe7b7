use crate::models::{MatchRating, RatingAck};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when forwarding a rating
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Receives validated session ratings
#[async_trait]
pub trait RatingSink: Send + Sync {
    async fn submit(&self, rating: MatchRating) -> Result<RatingAck, RatingError>;

    fn name(&self) -> &'static str;
}

/// Keeps ratings in memory and logs them
#[derive(Debug, Default)]
pub struct LoggingRatingSink {
    recorded: Mutex<Vec<MatchRating>>,
}

impl LoggingRatingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ratings received so far, oldest first
    pub fn recorded(&self) -> Vec<MatchRating> {
        match self.recorded.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl RatingSink for LoggingRatingSink {
    async fn submit(&self, rating: MatchRating) -> Result<RatingAck, RatingError> {
        tracing::info!(
            "Rating recorded: match={}, rating={}, feedback={}",
            rating.match_id,
            rating.rating,
            rating.feedback.is_some()
        );

        let ack = RatingAck {
            match_id: rating.match_id.clone(),
            rating_id: uuid::Uuid::new_v4().to_string(),
            accepted: true,
            recorded_at: chrono::Utc::now(),
        };

        match self.recorded.lock() {
            Ok(mut guard) => guard.push(rating),
            Err(poisoned) => poisoned.into_inner().push(rating),
        }

        Ok(ack)
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Forwards ratings to `POST {endpoint}/matches/{matchId}/rate`
pub struct RemoteRatingSink {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl RemoteRatingSink {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Result<Self, RatingError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl RatingSink for RemoteRatingSink {
    async fn submit(&self, rating: MatchRating) -> Result<RatingAck, RatingError> {
        let url = format!(
            "{}/matches/{}/rate",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&rating.match_id)
        );

        let mut request = self.client.post(&url).json(&serde_json::json!({
            "rating": rating.rating,
            "feedback": rating.feedback,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Rating for {} rejected: {} - {}", rating.match_id, status, body);
            return Err(RatingError::ApiError(format!("Failed to submit rating: {}", status)));
        }

        Ok(RatingAck {
            match_id: rating.match_id,
            rating_id: uuid::Uuid::new_v4().to_string(),
            accepted: true,
            recorded_at: chrono::Utc::now(),
        })
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
