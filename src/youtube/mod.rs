//! YouTube Data API v3 integration.
//!
//! Fetches the snippet (title, description, channel, tags) for a video
//! reference. A missing video is a normal outcome, not an error.
//!
//! API docs: https://developers.google.com/youtube/v3/docs/videos/list

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_metadata;
pub use client::YouTubeClient;
