//! Candidate level-ID extraction from free text.
//!
//! Four strict patterns are applied in priority order and union-combined;
//! a looser 6-7 digit fallback runs only when the strict union comes up
//! completely empty. Short digit runs have too many false positives (view
//! counts, dates, attempt counts) to be worth trying when any stronger
//! signal exists.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// "ID: 12345678", "Level ID - 12345678", "id=12345678"
static LABELED_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:level\s+)?id\s*[:=\-]?\s*(\d{6,9})\b").unwrap());

/// "(12345678)"
static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d{6,9})\)").unwrap());

/// "#12345678"
static HASH_TAGGED: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\d{6,9})\b").unwrap());

/// Bare standalone 8-9 digit token. Modern level IDs are 8-9 digits, so a
/// bare run of that length is a strong signal on its own.
static BARE_LONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{8,9})\b").unwrap());

/// Bare standalone 6-7 digit token. Fallback only.
static BARE_SHORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{6,7})\b").unwrap());

/// Extract candidate level IDs from `text`, highest-confidence first.
///
/// Output is deduplicated; the first occurrence of a candidate keeps its
/// position, so order encodes priority for the validation loop.
pub fn extract_candidates(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for pattern in [&LABELED_ID, &PARENTHESIZED, &HASH_TAGGED, &BARE_LONG] {
        for captures in pattern.captures_iter(text) {
            let id = captures[1].to_string();
            if seen.insert(id.clone()) {
                candidates.push(id);
            }
        }
    }

    if !candidates.is_empty() {
        return candidates;
    }

    for captures in BARE_SHORT.captures_iter(text) {
        let id = captures[1].to_string();
        if seen.insert(id.clone()) {
            candidates.push(id);
        }
    }

    candidates
}
