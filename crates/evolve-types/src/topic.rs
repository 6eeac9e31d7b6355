//! Affinity topic type and legacy-schema coercion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single affinity topic tracked for a profile.
///
/// Identity is by case-insensitive `name`; the stored casing is the
/// display-normalized form. `count` is how many refinement events have
/// touched the topic, `last_used` the most recent one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Short keyword or hyphenated concept
    pub name: String,
    /// Number of observations (always >= 1)
    pub count: u32,
    /// Most recent observation timestamp
    pub last_used: Option<DateTime<Utc>>,
}

impl Topic {
    /// Create a topic observed once at `now`.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            count: 1,
            last_used: Some(now),
        }
    }

    /// Case-insensitive identity key.
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Record one more observation at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.count = self.count.saturating_add(1);
        self.last_used = Some(now);
    }
}

/// Wire shape for a persisted topic.
///
/// Legacy records stored topics as bare strings; current records store the
/// full object. Both deserialize into [`Topic`]; a legacy string becomes
/// `{ name, count: 1, last_used: None }` and the load path stamps a
/// timestamp on it (see [`EvolvingProfile::normalize_loaded`]).
///
/// [`EvolvingProfile::normalize_loaded`]: crate::profile::EvolvingProfile::normalize_loaded
#[derive(Deserialize)]
#[serde(untagged)]
enum TopicRepr {
    Legacy(String),
    #[serde(rename_all = "camelCase")]
    Full {
        name: String,
        #[serde(default = "default_count")]
        count: u32,
        #[serde(default)]
        last_used: Option<DateTime<Utc>>,
    },
}

fn default_count() -> u32 {
    1
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let topic = match TopicRepr::deserialize(deserializer)? {
            TopicRepr::Legacy(name) => Topic {
                name: name.trim().to_string(),
                count: 1,
                last_used: None,
            },
            TopicRepr::Full {
                name,
                count,
                last_used,
            } => Topic {
                name: name.trim().to_string(),
                count: count.max(1),
                last_used,
            },
        };
        Ok(topic)
    }
}

/// Truncate a prompt to `max_chars` characters, appending an ellipsis
/// marker when anything was cut. Operates on characters, never splitting
/// a multi-byte codepoint.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> String {
    if prompt.chars().count() <= max_chars {
        return prompt.to_string();
    }
    let mut truncated: String = prompt.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}
