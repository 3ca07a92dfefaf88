//! Keyword filtering of the food catalog.
//!
//! Matching is a self-contained capability with one numeric contract:
//! [`similarity`] scores a keyword against a candidate name on a 0..=100
//! scale, and [`filter_foods`] keeps catalog entries scoring at or above a
//! threshold. Nothing else in the crate depends on how the score is
//! produced, so the implementation can be swapped without touching callers.

use super::catalog::FoodItem;

/// Score at or above which a catalog entry counts as a match.
pub const DEFAULT_MATCH_THRESHOLD: u32 = 60;

/// Similarity of two names on a 0..=100 scale.
///
/// Partial-ratio matching: the shorter string is slid over every
/// equal-length window of the longer one and the best normalized edit
/// distance wins, so a keyword that appears inside a longer food name
/// scores 100. Comparison is case-insensitive. An empty string scores 0
/// against anything non-empty.
pub fn similarity(a: &str, b: &str) -> u32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let (needle, hay) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    if needle.is_empty() {
        return if hay.is_empty() { 100 } else { 0 };
    }

    let hay: Vec<char> = hay.chars().collect();
    let window = needle.chars().count();

    let mut best = 0.0_f64;
    for slice in hay.windows(window) {
        let candidate: String = slice.iter().collect();
        let score = strsim::normalized_levenshtein(&needle, &candidate);
        if score > best {
            best = score;
        }
    }

    (best * 100.0).round() as u32
}

/// Keep the catalog entries whose name matches the keyword.
///
/// An empty (or all-whitespace) keyword keeps everything; otherwise entries
/// scoring below the threshold are dropped. Catalog order is preserved, so
/// the ranking is stable.
pub fn filter_foods(foods: Vec<FoodItem>, keyword: &str, threshold: u32) -> Vec<FoodItem> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return foods;
    }
    foods
        .into_iter()
        .filter(|food| similarity(keyword, &food.name) >= threshold)
        .collect()
}
