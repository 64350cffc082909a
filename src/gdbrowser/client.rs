//! GDBrowser HTTP client
//!
//! Handles communication with the GDBrowser API. Misses come back as
//! HTTP 404 or a literal `-1` body depending on the endpoint, so both are
//! mapped to `Ok(None)` before anything else tries to parse JSON.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{adapter, dto};
use crate::pipeline::domain::{GdLevel, LookupError};
use crate::ratelimit::RateLimiter;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// GDBrowser API client
pub struct GdBrowserClient {
    http_client: reqwest::Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl GdBrowserClient {
    pub fn new(base_url: impl Into<String>, limiter: Arc<RateLimiter>) -> Self {
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
            http_client,
            base_url: base_url.into(),
            limiter,
        }
    }

    /// Look up a level by ID. `Ok(None)` is a clean miss, not an error.
    pub async fn lookup_level(&self, level_id: &str) -> Result<Option<GdLevel>, LookupError> {
        let url = format!(
            "{}/api/level/{}",
            self.base_url,
            urlencoding::encode(level_id)
        );
        let Some(body) = self.get_or_miss(&url).await? else {
            debug!(level_id, "level not found");
            return Ok(None);
        };

        let level: dto::LevelDto =
            serde_json::from_str(&body).map_err(|e| LookupError::Parse(e.to_string()))?;
        Ok(Some(adapter::to_level(level)))
    }

    /// Search by name and take the authority's top-ranked hit.
    pub async fn search_levels(&self, name: &str) -> Result<Option<GdLevel>, LookupError> {
        let url = format!("{}/api/search/{}", self.base_url, urlencoding::encode(name));
        let Some(body) = self.get_or_miss(&url).await? else {
            debug!(name, "search found nothing");
            return Ok(None);
        };

        let levels: Vec<dto::LevelDto> =
            serde_json::from_str(&body).map_err(|e| LookupError::Parse(e.to_string()))?;
        Ok(levels.into_iter().next().map(adapter::to_level))
    }

    /// Issue a GET, mapping the API's two miss encodings (404 status and
    /// `-1` body) to `None` and everything else non-2xx to an error.
    async fn get_or_miss(&self, url: &str) -> Result<Option<String>, LookupError> {
        let _permit = self.limiter.admit().await;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;
        if body.trim() == "-1" {
            return Ok(None);
        }
        Ok(Some(body))
    }
}
