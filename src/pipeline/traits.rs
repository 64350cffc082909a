//! Trait definitions for the external service clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute the mocks below.

use async_trait::async_trait;

use super::domain::{GdLevel, LookupError, SemanticExtraction, VideoMetadata};

/// Video metadata lookup (YouTube Data API).
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Fetch the snippet for a video reference. `Ok(None)` means the video
    /// does not exist; transport failures are errors.
    async fn fetch_metadata(&self, video_id: &str) -> Result<Option<VideoMetadata>, LookupError>;
}

/// AI-assisted identifier/name extraction (Gemini).
#[async_trait]
pub trait SemanticApi: Send + Sync {
    /// Ask the model for a level ID and/or level names from the metadata.
    async fn extract(&self, metadata: &VideoMetadata) -> Result<SemanticExtraction, LookupError>;
}

/// Authoritative level lookup and search (GDBrowser).
#[async_trait]
pub trait LevelAuthority: Send + Sync {
    /// Look up a level by ID. `Ok(None)` is a clean miss, not an error.
    async fn lookup_level(&self, level_id: &str) -> Result<Option<GdLevel>, LookupError>;

    /// Search by name, taking the authority's top-ranked hit.
    async fn search_levels(&self, name: &str) -> Result<Option<GdLevel>, LookupError>;
}

// Implement traits for the real clients

#[async_trait]
impl MetadataApi for crate::youtube::YouTubeClient {
    async fn fetch_metadata(&self, video_id: &str) -> Result<Option<VideoMetadata>, LookupError> {
        self.fetch_metadata(video_id).await
    }
}

#[async_trait]
impl SemanticApi for crate::gemini::GeminiClient {
    async fn extract(&self, metadata: &VideoMetadata) -> Result<SemanticExtraction, LookupError> {
        self.extract(metadata).await
    }
}

#[async_trait]
impl LevelAuthority for crate::gdbrowser::GdBrowserClient {
    async fn lookup_level(&self, level_id: &str) -> Result<Option<GdLevel>, LookupError> {
        self.lookup_level(level_id).await
    }

    async fn search_levels(&self, name: &str) -> Result<Option<GdLevel>, LookupError> {
        self.search_levels(name).await
    }
}
