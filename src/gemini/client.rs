//! Gemini generateContent HTTP client
//!
//! Builds the extraction prompt from the video snippet, requests a
//! schema-constrained JSON reply, and parses it into the domain type.
//! Any malformed reply is a hard error of the call; the orchestrator
//! decides whether to absorb it.

use std::sync::Arc;
use std::time::Duration;

use super::dto;
use crate::pipeline::domain::{LookupError, SemanticExtraction, VideoMetadata};
use crate::ratelimit::RateLimiter;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini API client for semantic level extraction
pub struct GeminiClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    /// Description characters submitted; the rest is dropped to bound cost
    truncate_chars: usize,
    limiter: Arc<RateLimiter>,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        truncate_chars: usize,
        limiter: Arc<RateLimiter>,
    ) -> Self {
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
            api_key: api_key.into(),
            http_client,
            base_url: base_url.into(),
            model: model.into(),
            truncate_chars,
            limiter,
        }
    }

    /// Ask the model for a level ID and/or level names from the snippet.
    pub async fn extract(
        &self,
        metadata: &VideoMetadata,
    ) -> Result<SemanticExtraction, LookupError> {
        let _permit = self.limiter.admit().await;

        let request = self.build_request(metadata);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            urlencoding::encode(&self.api_key)
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(body) = response.json::<dto::ApiErrorResponse>().await {
                return Err(LookupError::Api {
                    status: status.as_u16(),
                    message: body.error.message,
                });
            }
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .json::<dto::GenerateContentResponse>()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| LookupError::Schema("response carried no candidate text".to_string()))?;

        let reply: dto::SemanticReply = serde_json::from_str(&text)
            .map_err(|e| LookupError::Schema(format!("reply did not match schema: {e}")))?;

        Ok(SemanticExtraction {
            level_id: reply.level_id,
            level_names: reply.level_names,
            confidence: reply.confidence,
            rationale: reply.rationale,
        })
    }

    fn build_request(&self, metadata: &VideoMetadata) -> dto::GenerateContentRequest {
        let description: String = metadata.description.chars().take(self.truncate_chars).collect();
        let prompt = format!(
            "You are identifying which Geometry Dash level a YouTube video is about.\n\
             Title: {title}\n\
             Channel: {channel}\n\
             Description: {description}\n\n\
             If the text states a numeric level ID, return it in levelId. \
             List any level names the video is about in levelNames, most likely first. \
             Set confidence to high, medium or low, and explain briefly in rationale.",
            title = metadata.title,
            channel = metadata.channel_title,
        );

        dto::GenerateContentRequest {
            contents: vec![dto::Content {
                parts: vec![dto::Part { text: prompt }],
            }],
            generation_config: dto::GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }
}

/// Schema the reply must conform to; the service rejects anything else
/// before we ever see it.
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "levelId": { "type": "STRING", "nullable": true },
            "levelNames": { "type": "ARRAY", "items": { "type": "STRING" } },
            "confidence": { "type": "STRING", "enum": ["high", "medium", "low"] },
            "rationale": { "type": "STRING" }
        },
        "required": ["levelNames", "confidence", "rationale"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(truncate_chars: usize) -> GeminiClient {
        GeminiClient::new(
            "test-key",
            "http://localhost:8080",
            "gemini-2.0-flash",
            truncate_chars,
            Arc::new(RateLimiter::per_minute("gemini", 15, 2, None)),
        )
    }

    fn snippet(description: &str) -> VideoMetadata {
        VideoMetadata {
            title: "Beating Bloodbath".to_string(),
            description: description.to_string(),
            channel_title: "SomeChannel".to_string(),
            tags: vec![],
        }
    }

    #[test]
    fn test_description_truncated_in_prompt() {
        let client = test_client(10);
        let request = client.build_request(&snippet(&"x".repeat(500)));
        let prompt = &request.contents[0].parts[0].text;
        assert!(prompt.contains(&"x".repeat(10)));
        assert!(!prompt.contains(&"x".repeat(11)));
    }

    #[test]
    fn test_prompt_carries_title_and_channel() {
        let client = test_client(1500);
        let request = client.build_request(&snippet("desc"));
        let prompt = &request.contents[0].parts[0].text;
        assert!(prompt.contains("Beating Bloodbath"));
        assert!(prompt.contains("SomeChannel"));
    }

    #[test]
    fn test_request_demands_structured_output() {
        let client = test_client(1500);
        let request = client.build_request(&snippet(""));
        assert_eq!(request.generation_config.response_mime_type, "application/json");
        let schema = &request.generation_config.response_schema;
        assert_eq!(schema["properties"]["confidence"]["enum"][0], "high");
    }
}
