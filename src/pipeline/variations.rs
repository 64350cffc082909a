//! Search-string variations for a level name.
//!
//! Video titles rarely carry the bare level name: they wrap it in completion
//! boilerplate ("Beating X", "X 100%") and collaboration titles join two
//! levels with a separator ("A vs B", "A x B"). Each variation is a cheap
//! extra search query against the authority.

use once_cell::sync::Lazy;
use regex::Regex;

/// Completion/verification/rating boilerplate that leads a level name.
static LEADING_QUALIFIERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:beating|beat|verifying|verified|completing|completed|rating|rated)\s+")
        .unwrap()
});

/// Category words that trail a level name, plus percentage boilerplate.
static TRAILING_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\s+(?:level|demon|challenge|layout)|\s+100\s*%)+\s*$").unwrap()
});

/// Tokens that join two level names in a collaboration/mashup title.
static SEPARATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\s+vs\.?\s+",
        r"(?i)\s+x\s+",
        r"(?i)\s+and\s+",
        r"\s*&\s*",
        r"\s*\|\s*",
        r"\s+-\s+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Produce alternate search strings for `name`, original first.
///
/// Adds a stripped form when qualifier/category removal changes the string,
/// then both sides of every separator split. Deduplicated, order-preserving,
/// empty strings removed.
pub fn variations_for(name: &str) -> Vec<String> {
    let mut variations = Vec::new();
    push_unique(&mut variations, name.trim());

    let unqualified = LEADING_QUALIFIERS.replace(name, "");
    let stripped = TRAILING_NOISE.replace(unqualified.as_ref(), "");
    push_unique(&mut variations, stripped.trim());

    for separator in SEPARATORS.iter() {
        if separator.is_match(name) {
            for side in separator.split(name) {
                push_unique(&mut variations, side.trim());
            }
        }
    }

    variations
}

fn push_unique(variations: &mut Vec<String>, candidate: &str) {
    if !candidate.is_empty() && !variations.iter().any(|existing| existing == candidate) {
        variations.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_always_included() {
        assert_eq!(variations_for("Bloodbath"), vec!["Bloodbath"]);
    }

    #[test]
    fn test_leading_qualifier_stripped() {
        let variations = variations_for("Beating Bloodbath");
        assert_eq!(variations, vec!["Beating Bloodbath", "Bloodbath"]);
    }

    #[test]
    fn test_trailing_category_stripped() {
        let variations = variations_for("Acheron level");
        assert_eq!(variations, vec!["Acheron level", "Acheron"]);
    }

    #[test]
    fn test_percentage_boilerplate_stripped() {
        let variations = variations_for("Verified Tidal Wave 100%");
        assert!(variations.contains(&"Tidal Wave".to_string()));
    }

    #[test]
    fn test_separator_split_x() {
        let variations = variations_for("Sunshine X Slaughterhouse");
        assert!(variations.contains(&"Sunshine X Slaughterhouse".to_string()));
        assert!(variations.contains(&"Sunshine".to_string()));
        assert!(variations.contains(&"Slaughterhouse".to_string()));
    }

    #[test]
    fn test_separator_split_vs_and_ampersand() {
        let variations = variations_for("Zodiac vs Cataclysm");
        assert!(variations.contains(&"Zodiac".to_string()));
        assert!(variations.contains(&"Cataclysm".to_string()));

        let variations = variations_for("Firework & Limbo");
        assert!(variations.contains(&"Firework".to_string()));
        assert!(variations.contains(&"Limbo".to_string()));
    }

    #[test]
    fn test_plain_hyphenated_name_not_split() {
        // "spaced dash" is a separator; an intra-word hyphen is not.
        let variations = variations_for("Sub-Zero");
        assert_eq!(variations, vec!["Sub-Zero"]);
    }

    #[test]
    fn test_deduplicated_and_no_empties() {
        let variations = variations_for("Bloodbath vs Bloodbath");
        assert_eq!(variations, vec!["Bloodbath vs Bloodbath", "Bloodbath"]);
        assert!(variations.iter().all(|v| !v.is_empty()));
    }
}
