//! The level extraction pipeline.
//!
//! Composes the external service clients into a staged fallback sequence:
//! regex candidates from the video text, then AI-assisted extraction, then
//! name search with variations. Every candidate is validated against
//! GDBrowser before being reported.

pub mod domain;
pub mod patterns;
pub mod service;
pub mod traits;
pub mod variations;

pub use domain::{ExtractionOutcome, FoundLevel, GdLevel, Stage, VideoMetadata};
pub use service::{ExtractionService, PipelineSettings};
