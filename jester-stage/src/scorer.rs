//! Punchline similarity scoring
//!
//! Combines two independent measures of how close a predicted punchline is
//! to the real one:
//! - character-edit similarity: `1 - levenshtein(a, b) / max(len(a), len(b))`
//! - token overlap: Jaccard index of the lower-cased word sets
//!
//! `similarity = 0.55 * edit + 0.45 * overlap`
//!
//! The scorer is pure: no I/O, no randomness, no shared state.

use std::collections::HashSet;

/// Weight of the character-edit term
pub const EDIT_WEIGHT: f64 = 0.55;

/// Weight of the token-overlap term
pub const TOKEN_WEIGHT: f64 = 0.45;

/// Punctuation that separates tokens in addition to whitespace
const TOKEN_PUNCTUATION: [char; 4] = ['.', '!', '?', ','];

/// Score of one predicted punchline against the real one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    /// Combined similarity (0.0 - 1.0)
    pub score: f64,
    /// Case-insensitive exact match
    pub is_exact_match: bool,
}

impl Similarity {
    const NONE: Similarity = Similarity {
        score: 0.0,
        is_exact_match: false,
    };
}

/// Stateless similarity scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score `predicted` against `actual`
    pub fn score(&self, actual: &str, predicted: &str) -> Similarity {
        if actual.trim().is_empty() || predicted.trim().is_empty() {
            return Similarity::NONE;
        }

        let actual = actual.to_lowercase();
        let predicted = predicted.to_lowercase();

        if actual == predicted {
            return Similarity {
                score: 1.0,
                is_exact_match: true,
            };
        }

        let score = EDIT_WEIGHT * edit_similarity(&actual, &predicted)
            + TOKEN_WEIGHT * token_overlap(&actual, &predicted);

        Similarity {
            score: score.clamp(0.0, 1.0),
            is_exact_match: false,
        }
    }
}

/// Character-edit similarity, normalized by the longer string
///
/// Lengths are counted in chars, matching `strsim::levenshtein`.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = strsim::levenshtein(a, b);
    1.0 - distance as f64 / max_len as f64
}

/// Jaccard similarity of the token sets; 0 when either set is empty
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let a_tokens = tokens(a);
    let b_tokens = tokens(b);

    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0.0;
    }

    let intersection = a_tokens.intersection(&b_tokens).count();
    let union = a_tokens.union(&b_tokens).count();
    intersection as f64 / union as f64
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| c.is_whitespace() || TOKEN_PUNCTUATION.contains(&c))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
