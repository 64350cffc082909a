//! Internal domain models for level extraction.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use serde::{Deserialize, Serialize};

/// Snippet metadata fetched for a YouTube video.
///
/// Immutable once fetched; owned by the orchestrator for the duration of one
/// extraction run and attached to the final outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,
    /// Video description
    pub description: String,
    /// Channel the video was uploaded to
    pub channel_title: String,
    /// Uploader-provided tags (may be empty)
    pub tags: Vec<String>,
}

impl VideoMetadata {
    /// Combined text the pattern stage searches: title, description and tags.
    pub fn search_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.description, self.tags.join(" "))
    }
}

/// Confidence label attached to a semantic extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Result of the AI-assisted extraction stage.
///
/// Produced at most once per run and consumed immediately; never persisted.
#[derive(Debug, Clone)]
pub struct SemanticExtraction {
    /// Level ID the model found in the text, if any
    pub level_id: Option<String>,
    /// Level names the model identified (used by the name-search stage)
    pub level_names: Vec<String>,
    /// How confident the model is in its extraction
    pub confidence: Confidence,
    /// Short free-text justification from the model
    pub rationale: String,
}

/// Canonical level record returned by GDBrowser.
///
/// Pass-through for presentation except `level_id`, which drives validation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GdLevel {
    /// The validated level ID
    pub level_id: String,
    /// Level name as registered on the servers
    pub name: String,
    /// Creator name
    pub author: String,
    /// Difficulty tier (e.g. "Extreme Demon")
    pub difficulty: String,
    /// Star rating (0 if unrated)
    pub stars: u32,
    /// Download counter
    pub downloads: u64,
    /// Like counter (can be negative)
    pub likes: i64,
    /// Length descriptor (e.g. "Long", "XL")
    pub length: String,
    /// Song title, when a custom song is attributed
    pub song_name: Option<String>,
    /// Song author, when a custom song is attributed
    pub song_author: Option<String>,
    /// Creator-provided level description
    pub description: Option<String>,
}

/// Which strategy tier produced a validated level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pattern,
    Semantic,
    NameSearch,
}

/// A validated extraction, with the context that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct FoundLevel {
    /// The validated level record
    pub level: GdLevel,
    /// Which stage produced the hit
    pub stage: Stage,
    /// Metadata of the video the level was extracted from
    pub metadata: VideoMetadata,
    /// Model confidence (semantic and name-search stages only)
    pub confidence: Option<Confidence>,
    /// Model rationale (semantic and name-search stages only)
    pub rationale: Option<String>,
    /// Names submitted to search, in order (name-search stage only)
    pub searched_names: Vec<String>,
}

/// Terminal outcome of one extraction run.
///
/// Closed sum so callers must handle every case; exactly one variant per run,
/// never mutated after construction.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// A stage produced a validated level
    Found(Box<FoundLevel>),
    /// The video reference could not be resolved to metadata at all
    VideoNotFound,
    /// Metadata resolved but every stage was exhausted without a hit
    LevelNotFound { metadata: VideoMetadata },
}

impl ExtractionOutcome {
    /// Convenience accessor for the found level, if any.
    pub fn level(&self) -> Option<&GdLevel> {
        match self {
            Self::Found(found) => Some(&found.level),
            _ => None,
        }
    }
}

/// Errors from the external service clients.
///
/// `Clone` (string payloads only) so test mocks can hand out stored errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed with HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Response violated the expected schema: {0}")]
    Schema(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_joins_title_description_tags() {
        let meta = VideoMetadata {
            title: "Beating Bloodbath".to_string(),
            description: "finally done".to_string(),
            channel_title: "someone".to_string(),
            tags: vec!["gd".to_string(), "demon".to_string()],
        };
        let text = meta.search_text();
        assert!(text.contains("Beating Bloodbath"));
        assert!(text.contains("finally done"));
        assert!(text.contains("gd demon"));
    }

    #[test]
    fn test_confidence_deserializes_lowercase() {
        let c: Confidence = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(c, Confidence::High);
        let c: Confidence = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(c, Confidence::Low);
    }

    #[test]
    fn test_outcome_level_accessor() {
        let outcome = ExtractionOutcome::VideoNotFound;
        assert!(outcome.level().is_none());

        let found = ExtractionOutcome::Found(Box::new(FoundLevel {
            level: GdLevel {
                level_id: "10565740".to_string(),
                ..Default::default()
            },
            stage: Stage::Pattern,
            metadata: VideoMetadata::default(),
            confidence: None,
            rationale: None,
            searched_names: vec![],
        }));
        assert_eq!(found.level().unwrap().level_id, "10565740");
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_string(&ExtractionOutcome::VideoNotFound).unwrap();
        assert!(json.contains("video_not_found"));
    }
}
