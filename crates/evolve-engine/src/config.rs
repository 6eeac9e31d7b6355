//! Evolution engine configuration.

use serde::{Deserialize, Serialize};

use evolve_types::{MAX_PROMPT_CHARS, TOPIC_CAPACITY};

/// Master configuration for the evolution engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Maximum retained topics per profile
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Maximum stored prompt length in characters
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_prompt_chars: default_max_prompt_chars(),
            scoring: ScoringConfig::default(),
        }
    }
}

fn default_capacity() -> usize {
    TOPIC_CAPACITY
}
fn default_max_prompt_chars() -> usize {
    MAX_PROMPT_CHARS
}

/// Retention scoring configuration.
///
/// The 0.4/0.6 frequency/recency blend trades strict recency (which would
/// churn on every use) against strict frequency (which would let one early
/// burst dominate forever). Day-scale decay keeps same-day reinforcement
/// dominant while month-old topics merely rank low instead of vanishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the normalized frequency component
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: f64,

    /// Weight of the time-decay component
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,

    /// Scores closer than this are treated as tied
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            frequency_weight: default_frequency_weight(),
            recency_weight: default_recency_weight(),
            tie_epsilon: default_tie_epsilon(),
        }
    }
}

fn default_frequency_weight() -> f64 {
    0.4
}
fn default_recency_weight() -> f64 {
    0.6
}
fn default_tie_epsilon() -> f64 {
    1e-4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvolutionConfig::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.max_prompt_chars, 200);
        assert!((config.scoring.frequency_weight - 0.4).abs() < f64::EPSILON);
        assert!((config.scoring.recency_weight - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_empty_object_uses_defaults() {
        let config: EvolutionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.capacity, 10);
        assert!((config.scoring.tie_epsilon - 1e-4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_partial_override() {
        let config: EvolutionConfig =
            serde_json::from_str(r#"{"capacity": 5, "scoring": {"recency_weight": 0.8}}"#).unwrap();
        assert_eq!(config.capacity, 5);
        assert!((config.scoring.recency_weight - 0.8).abs() < f64::EPSILON);
        // Untouched fields keep defaults
        assert!((config.scoring.frequency_weight - 0.4).abs() < f64::EPSILON);
    }
}
