//! Converts GDBrowser DTOs into domain types.

use super::dto;
use crate::pipeline::domain::GdLevel;

/// Convert a wire-format level into the domain record.
pub fn to_level(level: dto::LevelDto) -> GdLevel {
    GdLevel {
        level_id: level.id,
        name: level.name,
        author: level.author,
        difficulty: level.difficulty,
        stars: level.stars,
        downloads: level.downloads,
        likes: level.likes,
        length: level.length,
        song_name: level.song_name.filter(|s| !s.is_empty()),
        song_author: level.song_author.filter(|s| !s.is_empty()),
        description: level.description.filter(|s| !s.is_empty()),
    }
}
