//! Topic set merging and eviction.
//!
//! Pure function of the previous topic list, the newly observed names,
//! and a caller-supplied timestamp.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::scoring::AffinityScorer;
use evolve_types::Topic;

/// Result of merging one batch of observed names into a topic list.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The new ranked topic list, at most `capacity` entries
    pub topics: Vec<Topic>,
    /// Whether the list differs position-by-position from the previous one
    pub changed: bool,
}

/// Merge newly observed topic names into a previous topic list.
///
/// Duplicates within the batch collapse to one increment per unique
/// case-insensitive name. Existing topics keep their stored casing and
/// gain `count + 1` with a fresh timestamp; unseen names enter with
/// count 1. The merged set is ranked by the scorer and truncated to
/// `capacity`.
pub fn merge_topics(
    previous: &[Topic],
    names: &[String],
    now: DateTime<Utc>,
    scorer: &AffinityScorer,
    capacity: usize,
) -> MergeOutcome {
    let mut topics: Vec<Topic> = previous.to_vec();
    let mut by_key: HashMap<String, usize> = topics
        .iter()
        .enumerate()
        .map(|(i, t)| (t.key(), i))
        .collect();

    let mut applied: HashSet<String> = HashSet::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if !applied.insert(key.clone()) {
            continue;
        }
        match by_key.get(&key) {
            Some(&i) => topics[i].touch(now),
            None => {
                by_key.insert(key, topics.len());
                topics.push(Topic::new(trimmed, now));
            }
        }
    }

    scorer.rank(&mut topics, now);
    topics.truncate(capacity);

    let changed = topics != previous;
    MergeOutcome { topics, changed }
}
