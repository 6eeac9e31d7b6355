//! Candidate topic extraction.
//!
//! Derives likely topic names directly from free-form text via
//! tokenization and frequency ranking. Used as the fallback whenever the
//! model supplies no structured topics. Pure and deterministic: no state,
//! no I/O, same input always yields the same ranked list.

use std::collections::HashMap;

use crate::casing::display_case;
use evolve_types::TOPIC_CAPACITY;

/// Extract up to [`TOPIC_CAPACITY`] ranked topic names from two text
/// blobs, treated as one joined text.
pub fn extract_candidate_topics_from(original: &str, refined: &str) -> Vec<String> {
    extract_candidate_topics(&format!("{original} {refined}"))
}

/// Extract up to [`TOPIC_CAPACITY`] ranked, deduplicated topic names.
///
/// Adjacent-pair phrases are weighted double and always considered before
/// single words, so multi-word concepts win over their constituents.
pub fn extract_candidate_topics(text: &str) -> Vec<String> {
    let tokens = tokenize(text);

    // Bigrams form only from consecutive surviving tokens, counted by
    // literal phrase.
    let bigram_phrases: Vec<String> = tokens.windows(2).map(|w| w.join(" ")).collect();
    let mut bigrams = ranked_counts(&bigram_phrases);
    bigrams.truncate(2 * TOPIC_CAPACITY);
    let unigrams = ranked_counts(&tokens);

    let scored = bigrams
        .into_iter()
        .map(|(phrase, count)| (phrase, 2 * count))
        .chain(unigrams);

    let mut seen: Vec<String> = Vec::new();
    let mut candidates: Vec<String> = Vec::new();
    for (phrase, _score) in scored {
        let display = display_case(&phrase);
        let key = display.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        candidates.push(display);
        if candidates.len() == TOPIC_CAPACITY {
            break;
        }
    }
    candidates
}

/// Tokenize text into lowercase lexical items.
///
/// A token is a run of alphanumerics plus `+ # / .`, at least two
/// characters long (preserves "c++", "c#", "node.js"). Filters out:
/// - Stop words (common English filler and request words)
/// - Purely numeric tokens
/// - Tokens shorter than 3 characters, unless they contain `+` or `#`
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '/' | '.')))
        .filter(|s| s.chars().count() >= 2)
        .filter(|s| !is_stop_word(s))
        .filter(|s| !s.chars().all(|c| c.is_numeric()))
        .filter(|s| s.chars().count() >= 3 || s.contains('+') || s.contains('#'))
        .map(String::from)
        .collect()
}

/// Count occurrences and rank by frequency descending.
///
/// Ties keep first-occurrence order (stable sort over insertion order),
/// so the output is deterministic.
fn ranked_counts(items: &[String]) -> Vec<(String, u32)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, u32)> = Vec::new();

    for item in items {
        match index.get(item.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item.clone(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Check if a word is a stop word.
fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "about", "all", "and", "any", "are", "but", "can", "could", "does", "for", "from", "get",
        "give", "have", "help", "how", "its", "just", "like", "make", "need", "new", "not",
        "our", "please", "should", "some", "that", "the", "their", "them", "then", "they", "this",
        "use", "using", "want", "was", "were", "what", "when", "which", "will", "with", "would",
        "you", "your", "also", "been", "being", "into", "more", "most", "only", "other", "over",
        "such", "than", "there", "very",
    ];

    STOP_WORDS.contains(&word)
}
