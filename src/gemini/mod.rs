//! Gemini integration for AI-assisted level extraction.
//!
//! Calls generateContent with a response schema so the reply is constrained
//! JSON, never free text. The client parses that document straight into the
//! domain type, so there is no separate adapter.
//!
//! API docs: https://ai.google.dev/api/generate-content

pub mod dto;
mod client;

pub use client::GeminiClient;
