//! GDBrowser API Data Transfer Objects
//!
//! These types match EXACTLY what GDBrowser returns.
//! DO NOT use these types outside the gdbrowser module - convert to domain types.
//!
//! API Reference: https://github.com/GDColon/GDBrowser#the-api
//!
//! GDBrowser mirrors the raw GD server encoding in places, so some numeric
//! fields arrive as strings depending on the level; the deserializers below
//! accept both.

use serde::{Deserialize, Deserializer};

/// One level record as returned by `/api/level/{id}` and `/api/search/{name}`
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDto {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub stars: u32,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub likes: i64,
    #[serde(default)]
    pub length: String,
    #[serde(rename = "songName", default)]
    pub song_name: Option<String>,
    #[serde(rename = "songAuthor", default)]
    pub song_author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(u64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_number(deserializer)
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    lenient_number(deserializer)
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    lenient_number(deserializer)
}

fn lenient_number<'de, D, N>(deserializer: D) -> Result<N, D::Error>
where
    D: Deserializer<'de>,
    N: Deserialize<'de> + std::str::FromStr + Default,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<N> {
        Number(N),
        String(String),
    }
    Ok(match Raw::<N>::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::String(s) => s.parse().unwrap_or_default(),
    })
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
