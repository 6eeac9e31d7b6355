//! Frequency + time-decay scoring for topic retention.
//!
//! Scores combine a normalized frequency component with a day-scale decay
//! of the last-used timestamp. Ranking decides which topics survive when
//! the set exceeds capacity.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use evolve_types::Topic;

/// Calculates retention scores and ranks topic sets.
///
/// `score = frequency_weight × (count / max_count) + recency_weight × recency`
/// where `recency = 1 / (1 + days_since_last_use)` in fractional days.
/// A topic that was never used scores zero recency.
pub struct AffinityScorer {
    config: ScoringConfig,
}

impl AffinityScorer {
    /// Create a scorer with the given configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score a single topic against the batch maximum count.
    pub fn score(&self, topic: &Topic, max_count: u32, now: DateTime<Utc>) -> f64 {
        let frequency = f64::from(topic.count) / f64::from(max_count.max(1));
        let recency = match topic.last_used {
            Some(last_used) => 1.0 / (1.0 + days_between(last_used, now)),
            None => 0.0,
        };
        self.config.frequency_weight * frequency + self.config.recency_weight * recency
    }

    /// Sort topics descending by score.
    ///
    /// Scores within `tie_epsilon` of each other count as tied and break
    /// on the more recent `last_used`; fully equal entries keep their
    /// relative order (the sort is stable).
    pub fn rank(&self, topics: &mut Vec<Topic>, now: DateTime<Utc>) {
        let max_count = topics.iter().map(|t| t.count).max().unwrap_or(1).max(1);
        let mut scored: Vec<(Topic, f64)> = topics
            .drain(..)
            .map(|topic| {
                let score = self.score(&topic, max_count, now);
                (topic, score)
            })
            .collect();

        scored.sort_by(|(a, score_a), (b, score_b)| {
            if (score_a - score_b).abs() <= self.config.tie_epsilon {
                b.last_used.cmp(&a.last_used)
            } else {
                score_b.partial_cmp(score_a).unwrap_or(Ordering::Equal)
            }
        });

        *topics = scored.into_iter().map(|(topic, _)| topic).collect();
    }
}

impl Default for AffinityScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Fractional days between two timestamps.
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    to.signed_duration_since(from).num_seconds() as f64 / 86400.0
}
