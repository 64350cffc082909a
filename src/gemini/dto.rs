//! Gemini generateContent Data Transfer Objects
//!
//! These types match EXACTLY the generateContent wire format.
//! DO NOT use these types outside the gemini module - convert to domain types.
//!
//! API Reference: https://ai.google.dev/api/generate-content
//!
//! With `responseMimeType: application/json` and a `responseSchema` set, the
//! single candidate's text part is itself a JSON document conforming to the
//! schema; [`SemanticReply`] is the shape of that inner document.

use serde::{Deserialize, Serialize};

use crate::pipeline::domain::Confidence;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    /// JSON schema the model's reply must conform to
    #[serde(rename = "responseSchema")]
    pub response_schema: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

/// The schema-constrained document inside the candidate's text part.
#[derive(Debug, Clone, Deserialize)]
pub struct SemanticReply {
    #[serde(rename = "levelId")]
    pub level_id: Option<String>,
    #[serde(rename = "levelNames", default)]
    pub level_names: Vec<String>,
    pub confidence: Confidence,
    pub rationale: String,
}

/// Error body returned on non-2xx
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
