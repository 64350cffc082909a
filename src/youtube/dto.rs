//! YouTube Data API Data Transfer Objects
//!
//! These types match EXACTLY what the videos.list endpoint returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the youtube module - convert to domain types.
//!
//! API Reference: https://developers.google.com/youtube/v3/docs/videos/list
//!
//! Example response:
//! ```json
//! {
//!   "items": [{
//!     "id": "dQw4w9WgXcQ",
//!     "snippet": {
//!       "title": "Video Title",
//!       "description": "...",
//!       "channelTitle": "Channel",
//!       "tags": ["a", "b"]
//!     }
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level videos.list response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideosListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

/// One video resource
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: Snippet,
}

/// The snippet part of a video resource
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    /// Absent entirely when the uploader set no tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Error body returned on non-2xx
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_response_with_snippet() {
        let json = r#"{
            "kind": "youtube#videoListResponse",
            "items": [{
                "kind": "youtube#video",
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "publishedAt": "2009-10-25T06:57:33Z",
                    "title": "Beating Bloodbath (ID: 10565740)",
                    "description": "finally...",
                    "channelTitle": "SomeChannel",
                    "tags": ["geometry dash", "demon"]
                }
            }]
        }"#;

        let response: VideosListResponse =
            serde_json::from_str(json).expect("Should parse videos.list response");

        assert_eq!(response.items.len(), 1);
        let snippet = &response.items[0].snippet;
        assert_eq!(snippet.title, "Beating Bloodbath (ID: 10565740)");
        assert_eq!(snippet.channel_title, "SomeChannel");
        assert_eq!(snippet.tags, vec!["geometry dash", "demon"]);
    }

    #[test]
    fn test_parse_empty_items_means_no_video() {
        let json = r#"{"kind": "youtube#videoListResponse", "items": []}"#;
        let response: VideosListResponse = serde_json::from_str(json).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_parse_snippet_without_tags() {
        let json = r#"{
            "items": [{
                "id": "abc",
                "snippet": {"title": "untagged", "description": "", "channelTitle": "c"}
            }]
        }"#;
        let response: VideosListResponse = serde_json::from_str(json).unwrap();
        assert!(response.items[0].snippet.tags.is_empty());
    }

    #[test]
    fn test_parse_error_body() {
        let json = r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#;
        let response: ApiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.code, 403);
        assert_eq!(response.error.message, "quotaExceeded");
    }
}
