//! GDBrowser API integration - the authoritative level lookup.
//!
//! Validates candidate IDs via `/api/level/{id}` and resolves names via
//! `/api/search/{name}`. GDBrowser signals a miss with HTTP 404 or a literal
//! `-1` body; both map to a clean `None`, distinct from transport errors.
//!
//! API docs: https://github.com/GDColon/GDBrowser#the-api

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_level;
pub use client::GdBrowserClient;
