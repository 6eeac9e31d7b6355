//! Response normalization.
//!
//! Parses an LLM's raw reply into a structured refinement result. Model
//! output is untrusted and may be plain text, bare JSON, fenced JSON, or
//! JSON embedded in prose; every shape degrades to a best-effort result
//! and this path never fails.

use serde_json::Value;
use tracing::debug;

use crate::extraction::extract_candidate_topics_from;
use evolve_types::TOPIC_CAPACITY;

/// Key aliases accepted for the refined prompt, tolerating model
/// key-naming drift.
const REFINED_KEYS: &[&str] = &[
    "refinedPrompt",
    "refined_prompt",
    "prompt",
    "refined",
    "improvedPrompt",
    "improved_prompt",
    "output",
];

/// Key aliases accepted for the topic array.
const TOPIC_KEYS: &[&str] = &["topics", "keywords", "tags", "subjects"];

/// The structured result of normalizing one model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// Best-effort refined prompt (trimmed raw text when no JSON applies)
    pub refined_prompt: String,
    /// Topic names, at most [`TOPIC_CAPACITY`] entries
    pub topics: Vec<String>,
    /// The untouched raw model output, kept for audit
    pub raw_text: String,
}

/// Normalize a raw model reply against the original prompt.
///
/// The original prompt is used only as fallback extraction input when the
/// reply carries no usable topics.
pub fn normalize_refinement(raw: &str, original_prompt: &str) -> Refinement {
    let mut refined_prompt = raw.trim().to_string();
    let mut topics: Vec<String> = Vec::new();

    if let Some(segment) = locate_json_segment(raw) {
        match serde_json::from_str::<Value>(segment) {
            Ok(value) => {
                if let Some(candidate) = first_string_alias(&value, REFINED_KEYS) {
                    let candidate = candidate.trim();
                    if !candidate.is_empty() {
                        refined_prompt = candidate.to_string();
                    }
                }
                if let Some(array) = first_array_alias(&value, TOPIC_KEYS) {
                    topics = array
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .take(TOPIC_CAPACITY)
                        .collect();
                }
            }
            Err(e) => {
                debug!(error = %e, "Model reply contained unparseable JSON, using raw text");
            }
        }
    }

    if topics.is_empty() {
        topics = extract_candidate_topics_from(original_prompt, &refined_prompt);
    }

    Refinement {
        refined_prompt,
        topics,
        raw_text: raw.to_string(),
    }
}

/// Locate the JSON object inside a raw reply.
///
/// Priority: fenced code block interior, the whole trimmed text when it is
/// brace-delimited, then the substring between the first `{` and the last
/// `}`. The first strategy that matches wins; parse failures do not
/// cascade to the next one.
fn locate_json_segment(raw: &str) -> Option<&str> {
    if let Some(interior) = fenced_block(raw) {
        return Some(interior);
    }

    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    let first = raw.find('{')?;
    let last = raw.rfind('}')?;
    if last > first {
        return Some(&raw[first..=last]);
    }
    None
}

/// Interior of the first triple-backtick block, with an optional "json"
/// tag stripped.
fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim())
}

/// First alias key holding a string value.
fn first_string_alias<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| value.get(key)?.as_str())
}

/// First alias key holding an array value.
fn first_array_alias<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|key| value.get(key)?.as_array())
}
