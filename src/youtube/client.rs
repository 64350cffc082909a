//! YouTube Data API HTTP client
//!
//! Handles communication with the videos.list endpoint. Every request is
//! admitted through the `youtube` rate limiter before it leaves the process.

use std::sync::Arc;
use std::time::Duration;

use super::{adapter, dto};
use crate::pipeline::domain::{LookupError, VideoMetadata};
use crate::ratelimit::RateLimiter;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// YouTube Data API client
pub struct YouTubeClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl YouTubeClient {
    /// Create a new client with the given API key and limiter.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, limiter: Arc<RateLimiter>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http_client,
            base_url: base_url.into(),
            limiter,
        }
    }

    /// Fetch the snippet for a video. `Ok(None)` means the video does not
    /// exist (or is private); transport and API failures are errors.
    pub async fn fetch_metadata(
        &self,
        video_id: &str,
    ) -> Result<Option<VideoMetadata>, LookupError> {
        let _permit = self.limiter.admit().await;

        let url = format!(
            "{}/videos?part=snippet&id={}&key={}",
            self.base_url,
            urlencoding::encode(video_id),
            urlencoding::encode(&self.api_key)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The Data API wraps errors in a JSON envelope; surface its
            // message when we can get at it.
            if let Ok(body) = response.json::<dto::ApiErrorResponse>().await {
                return Err(LookupError::Api {
                    status: status.as_u16(),
                    message: body.error.message,
                });
            }
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .json::<dto::VideosListResponse>()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(body
            .items
            .into_iter()
            .next()
            .map(|item| adapter::to_metadata(item.snippet)))
    }
}
