//! Converts YouTube API DTOs into domain types.

use super::dto;
use crate::pipeline::domain::VideoMetadata;

/// Convert a snippet into the pipeline's metadata type.
pub fn to_metadata(snippet: dto::Snippet) -> VideoMetadata {
    VideoMetadata {
        title: snippet.title,
        description: snippet.description,
        channel_title: snippet.channel_title,
        tags: snippet.tags,
    }
}
