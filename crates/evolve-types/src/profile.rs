//! Profile records and load-time coercion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::topic::{truncate_prompt, Topic};
use crate::{MAX_PROMPT_CHARS, TOPIC_CAPACITY};

/// The bounded, ranked, decaying topic set tracked per profile.
///
/// `topics` ordering is significant: it reflects descending rank at the
/// moment of last write and is persisted as-is, never re-sorted lazily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolvingProfile {
    /// Ranked topics, at most [`TOPIC_CAPACITY`] entries
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// When the engine last wrote this record
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Number of refinement events recorded
    #[serde(default)]
    pub usage_count: u64,
    /// Last-seen prompt, truncated to [`MAX_PROMPT_CHARS`] characters
    #[serde(default)]
    pub last_prompt: String,
}

impl EvolvingProfile {
    /// Coerce an untrusted persisted value into an `EvolvingProfile`.
    ///
    /// Legacy bare-string topics become full entries stamped with `now`;
    /// any record that does not deserialize at all coerces to an empty
    /// profile rather than failing.
    pub fn from_value(value: &Value, now: DateTime<Utc>) -> Self {
        let mut profile: EvolvingProfile =
            serde_json::from_value(value.clone()).unwrap_or_default();
        profile.normalize_loaded(now);
        profile
    }

    /// Repair invariants after deserialization.
    ///
    /// Drops empty names, stamps `now` on entries without a timestamp
    /// (the legacy-string migration case), re-truncates the topic list
    /// and the stored prompt. Idempotent.
    pub fn normalize_loaded(&mut self, now: DateTime<Utc>) {
        self.topics.retain(|t| !t.name.trim().is_empty());
        for topic in &mut self.topics {
            topic.name = topic.name.trim().to_string();
            topic.count = topic.count.max(1);
            if topic.last_used.is_none() {
                topic.last_used = Some(now);
            }
        }
        self.topics.truncate(TOPIC_CAPACITY);
        self.last_prompt = truncate_prompt(&self.last_prompt, MAX_PROMPT_CHARS);
    }
}

/// One user profile in the persisted set.
///
/// The engine owns exactly one field, `evolving_profile`. Everything else
/// (persona, tone, style guidelines, identity) belongs to external UI code
/// and round-trips untouched through the flattened `extra` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile identifier
    pub id: String,
    /// The engine-owned topic affinity record
    #[serde(default, deserialize_with = "lenient_evolving_profile")]
    pub evolving_profile: EvolvingProfile,
    /// All other profile fields, preserved byte-for-byte
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Deserialize an `EvolvingProfile`, coercing any non-conforming value to
/// the empty profile instead of failing the surrounding record.
fn lenient_evolving_profile<'de, D>(deserializer: D) -> Result<EvolvingProfile, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// The whole persisted record: every profile plus the active selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSet {
    /// All profiles, id unique
    #[serde(default)]
    pub list: Vec<Profile>,
    /// Currently active profile, if any
    #[serde(default)]
    pub active_profile_id: Option<String>,
}

impl ProfileSet {
    /// Index of the active profile in `list`, if one is selected and present.
    pub fn active_index(&self) -> Option<usize> {
        let active_id = self.active_profile_id.as_deref()?;
        self.list.iter().position(|p| p.id == active_id)
    }
}
