//! Twitter/X notification sink

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use super::oauth::{authorization_header, OAuth1Credentials};
use super::sink::NotificationSink;
use crate::common::errors::{Result, WatcherError};

/// Request body for POST /2/tweets
#[derive(Debug, Clone, Serialize)]
struct TweetRequest {
    text: String,
}

/// Response body from POST /2/tweets
#[derive(Debug, Clone, Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Debug, Clone, Deserialize)]
struct TweetData {
    id: String,
}

/// Sink that posts notifications to the v2 tweet endpoint
#[derive(Debug, Clone)]
pub struct TwitterSink {
    /// HTTP client
    client: Client,
    /// API base URL
    api_url: String,
    /// OAuth 1.0a user-context credentials
    credentials: OAuth1Credentials,
}

impl TwitterSink {
    /// Create a new sink
    pub fn new(api_url: &str, credentials: OAuth1Credentials) -> Result<Self> {
        Self::with_timeout(api_url, credentials, Duration::from_secs(30))
    }

    /// Create a new sink with a custom request timeout
    pub fn with_timeout(
        api_url: &str,
        credentials: OAuth1Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WatcherError::Sink(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }
}

#[async_trait]
impl NotificationSink for TwitterSink {
    #[instrument(skip(self, text))]
    async fn publish(&self, text: &str) -> Result<()> {
        let url = format!("{}/2/tweets", self.api_url);
        let header = authorization_header(&self.credentials, "POST", &url)?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", header)
            .json(&TweetRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WatcherError::Sink(format!(
                "post rejected with status {status}: {body}"
            )));
        }

        if let Ok(tweet) = response.json::<TweetResponse>().await {
            debug!(id = %tweet.data.id, "posted");
        }
        Ok(())
    }
}
