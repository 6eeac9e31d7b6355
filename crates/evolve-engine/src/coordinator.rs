//! Evolution coordination.
//!
//! Drives one evolve-and-persist cycle per refinement: resolve topic
//! names, merge them into the active profile's topic set, and write the
//! whole profile set back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::config::EvolutionConfig;
use crate::extraction::extract_candidate_topics_from;
use crate::merge::merge_topics;
use crate::scoring::AffinityScorer;
use evolve_storage::ProfileStore;
use evolve_types::{truncate_prompt, ProfileSet};

/// One refinement event, as produced by the response normalizer.
#[derive(Debug, Clone, Default)]
pub struct RefinementEvent {
    /// The user's original prompt
    pub prompt: String,
    /// The refined prompt text
    pub refined: String,
    /// Topic names supplied upstream; may be empty
    pub topics: Vec<String>,
}

impl RefinementEvent {
    /// Build an event from a normalized refinement result.
    pub fn from_refinement(prompt: impl Into<String>, refinement: &crate::Refinement) -> Self {
        Self {
            prompt: prompt.into(),
            refined: refinement.refined_prompt.clone(),
            topics: refinement.topics.clone(),
        }
    }
}

/// Result of evolving a profile set.
#[derive(Debug, Clone)]
pub struct EvolveOutcome {
    /// Whether the active profile's ranked topic list was altered
    pub changed: bool,
    /// The updated set; identical to the input when there was no active
    /// profile
    pub profile_set: ProfileSet,
}

/// Evolve the active profile with default configuration.
///
/// Pure: persistence is the caller's responsibility.
pub fn evolve_profile(
    profile_set: ProfileSet,
    active_index: Option<usize>,
    event: &RefinementEvent,
    now: DateTime<Utc>,
) -> EvolveOutcome {
    evolve_profile_with(&EvolutionConfig::default(), profile_set, active_index, event, now)
}

/// Evolve the active profile in a profile set.
///
/// No-op when `active_index` is absent or out of range. Topic names come
/// from the event when supplied, otherwise from candidate extraction over
/// the prompt and its refinement (a second-chance fallback, independent
/// of the normalizer's own). Usage bookkeeping — `usage_count`,
/// `last_updated`, `last_prompt` — always advances, even when the ranked
/// topic set itself is unchanged. Only the active entry in `list` is
/// replaced; every other profile and every non-engine field is untouched.
pub fn evolve_profile_with(
    config: &EvolutionConfig,
    mut profile_set: ProfileSet,
    active_index: Option<usize>,
    event: &RefinementEvent,
    now: DateTime<Utc>,
) -> EvolveOutcome {
    let Some(index) = active_index.filter(|&i| i < profile_set.list.len()) else {
        debug!("No active profile, skipping evolution");
        return EvolveOutcome {
            changed: false,
            profile_set,
        };
    };

    let profile = &mut profile_set.list[index];
    // Persisted state is untrusted; repair legacy shapes before merging
    profile.evolving_profile.normalize_loaded(now);

    let extracted;
    let names: &[String] = if event.topics.is_empty() {
        extracted = extract_candidate_topics_from(&event.prompt, &event.refined);
        &extracted
    } else {
        &event.topics
    };

    let scorer = AffinityScorer::new(config.scoring.clone());
    let outcome = merge_topics(
        &profile.evolving_profile.topics,
        names,
        now,
        &scorer,
        config.capacity,
    );

    profile.evolving_profile.topics = outcome.topics;
    profile.evolving_profile.usage_count += 1;
    profile.evolving_profile.last_updated = Some(now);
    profile.evolving_profile.last_prompt = truncate_prompt(&event.prompt, config.max_prompt_chars);

    EvolveOutcome {
        changed: outcome.changed,
        profile_set,
    }
}

/// Apply a manually edited topic list to a profile.
///
/// The manual-edit path differs from auto-evolution on purpose: when the
/// merge reports no change it returns `None` and writes nothing, and it
/// never bumps usage bookkeeping.
pub fn apply_manual_topics(
    config: &EvolutionConfig,
    mut profile_set: ProfileSet,
    index: usize,
    names: &[String],
    now: DateTime<Utc>,
) -> Option<ProfileSet> {
    let profile = profile_set.list.get_mut(index)?;
    profile.evolving_profile.normalize_loaded(now);

    let scorer = AffinityScorer::new(config.scoring.clone());
    let outcome = merge_topics(
        &profile.evolving_profile.topics,
        names,
        now,
        &scorer,
        config.capacity,
    );
    if !outcome.changed {
        return None;
    }
    profile.evolving_profile.topics = outcome.topics;
    Some(profile_set)
}

/// Persisting coordinator: one read-modify-write per refinement.
///
/// The store holds a single profile-set record shared by all in-flight
/// refinements. The read-modify-write here is not atomic: two
/// refinements resolved out of order against the same profile race, and
/// the later write wins in full, discarding the other's deltas. This
/// last-write-wins behavior is the store's documented contract, not an
/// oversight.
pub struct EvolutionCoordinator<S> {
    store: Arc<S>,
    key: String,
    config: EvolutionConfig,
}

impl<S: ProfileStore + 'static> EvolutionCoordinator<S> {
    /// Create a coordinator over the record stored under `key`.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        Self::with_config(store, key, EvolutionConfig::default())
    }

    /// Create a coordinator with custom configuration.
    pub fn with_config(store: Arc<S>, key: impl Into<String>, config: EvolutionConfig) -> Self {
        Self {
            store,
            key: key.into(),
            config,
        }
    }

    /// Record one refinement event against the active profile.
    ///
    /// Returns whether the ranked topic set changed. Storage failures are
    /// logged and swallowed: evolution must never block or fail the
    /// delivery of the refinement result itself.
    #[instrument(skip(self, event), fields(key = %self.key))]
    pub async fn record_refinement(&self, event: &RefinementEvent) -> bool {
        let now = Utc::now();

        let profile_set = match self.store.load(&self.key).await {
            Ok(Some(set)) => set,
            Ok(None) => {
                debug!("No profile set stored, skipping evolution");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load profile set, skipping evolution");
                return false;
            }
        };

        let Some(index) = profile_set.active_index() else {
            debug!("No active profile, skipping evolution");
            return false;
        };

        let outcome = evolve_profile_with(&self.config, profile_set, Some(index), event, now);

        if let Err(e) = self.store.save(&self.key, &outcome.profile_set).await {
            warn!(error = %e, "Failed to persist evolved profile");
        }
        outcome.changed
    }

    /// Record a refinement without blocking the caller.
    ///
    /// The write runs on a spawned task; the caller's refinement result
    /// is delivered regardless of whether it has completed, failed, or is
    /// still in flight. No timeout is imposed here.
    pub fn record_refinement_detached(
        self: &Arc<Self>,
        event: RefinementEvent,
    ) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            coordinator.record_refinement(&event).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolve_storage::MemoryProfileStore;
    use evolve_types::{EvolvingProfile, Profile, Topic};
    use serde_json::Value;

    fn set_with_active(id: &str) -> ProfileSet {
        ProfileSet {
            list: vec![
                Profile {
                    id: "other".into(),
                    ..Default::default()
                },
                Profile {
                    id: id.into(),
                    ..Default::default()
                },
            ],
            active_profile_id: Some(id.into()),
        }
    }

    fn event(prompt: &str, refined: &str, topics: &[&str]) -> RefinementEvent {
        RefinementEvent {
            prompt: prompt.into(),
            refined: refined.into(),
            topics: topics.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_active_profile_is_noop() {
        let now = Utc::now();
        let mut set = set_with_active("p1");
        set.active_profile_id = None;
        let before = set.clone();

        let outcome = evolve_profile(set, None, &event("x", "y", &["T"]), now);
        assert!(!outcome.changed);
        assert_eq!(outcome.profile_set, before);
    }

    #[test]
    fn test_out_of_range_index_is_noop() {
        let now = Utc::now();
        let set = set_with_active("p1");
        let before = set.clone();
        let outcome = evolve_profile(set, Some(99), &event("x", "y", &["T"]), now);
        assert!(!outcome.changed);
        assert_eq!(outcome.profile_set, before);
    }

    #[test]
    fn test_supplied_topics_merged() {
        let now = Utc::now();
        let set = set_with_active("p1");
        let outcome = evolve_profile(set, Some(1), &event("p", "r", &["Rust", "Docker"]), now);

        assert!(outcome.changed);
        let evolving = &outcome.profile_set.list[1].evolving_profile;
        assert_eq!(evolving.topics.len(), 2);
        assert_eq!(evolving.usage_count, 1);
        assert_eq!(evolving.last_updated, Some(now));
        assert_eq!(evolving.last_prompt, "p");
    }

    #[test]
    fn test_empty_topics_fall_back_to_extraction() {
        let now = Utc::now();
        let set = set_with_active("p1");
        let outcome = evolve_profile(
            set,
            Some(1),
            &event("build a CI pipeline with jenkins", "refined text", &[]),
            now,
        );

        let evolving = &outcome.profile_set.list[1].evolving_profile;
        assert!(!evolving.topics.is_empty());
        assert!(evolving
            .topics
            .iter()
            .any(|t| t.name.to_lowercase().contains("jenkins")));
    }

    #[test]
    fn test_bookkeeping_advances_without_topic_change() {
        let now = Utc::now();
        let set = set_with_active("p1");

        let first = evolve_profile(set, Some(1), &event("p1 text", "r", &["Rust"]), now);
        // A stopword-only prompt extracts nothing, so the merge is a no-op
        let second = evolve_profile(first.profile_set, Some(1), &event("the and with", "", &[]), now);

        assert!(!second.changed);
        let evolving = &second.profile_set.list[1].evolving_profile;
        assert_eq!(evolving.usage_count, 2);
        assert_eq!(evolving.last_prompt, "the and with");
        assert_eq!(evolving.last_updated, Some(now));
    }

    #[test]
    fn test_only_active_entry_replaced() {
        let now = Utc::now();
        let mut set = set_with_active("p1");
        set.list[0]
            .extra
            .insert("persona".into(), Value::String("untouched".into()));
        let other_before = set.list[0].clone();

        let outcome = evolve_profile(set, Some(1), &event("p", "r", &["Go"]), now);
        assert_eq!(outcome.profile_set.list[0], other_before);
    }

    #[test]
    fn test_prompt_truncated_in_bookkeeping() {
        let now = Utc::now();
        let set = set_with_active("p1");
        let long_prompt = "y".repeat(300);
        let outcome = evolve_profile(set, Some(1), &event(&long_prompt, "r", &["T"]), now);

        let stored = &outcome.profile_set.list[1].evolving_profile.last_prompt;
        assert_eq!(stored.chars().count(), 201);
        assert!(stored.ends_with('…'));
    }

    #[test]
    fn test_legacy_topics_migrated_before_merge() {
        let now = Utc::now();
        let mut set = set_with_active("p1");
        set.list[1].evolving_profile.topics = vec![Topic {
            name: "Docker".into(),
            count: 1,
            last_used: None,
        }];

        let outcome = evolve_profile(set, Some(1), &event("p", "r", &["docker"]), now);
        let evolving = &outcome.profile_set.list[1].evolving_profile;
        assert_eq!(evolving.topics.len(), 1);
        assert_eq!(evolving.topics[0].count, 2);
        assert_eq!(evolving.topics[0].last_used, Some(now));
    }

    #[test]
    fn test_manual_edit_skips_noop_write() {
        let config = EvolutionConfig::default();
        let now = Utc::now();
        let mut set = set_with_active("p1");
        set.list[1].evolving_profile = EvolvingProfile {
            topics: vec![Topic::new("Rust", now)],
            ..Default::default()
        };

        // Merging nothing leaves the list untouched: no write at all
        assert!(apply_manual_topics(&config, set.clone(), 1, &[], now).is_none());

        // A real edit goes through, without usage bookkeeping
        let updated = apply_manual_topics(
            &config,
            set,
            1,
            &["Kubernetes".to_string()],
            now,
        )
        .unwrap();
        let evolving = &updated.list[1].evolving_profile;
        assert_eq!(evolving.topics.len(), 2);
        assert_eq!(evolving.usage_count, 0);
        assert!(evolving.last_updated.is_none());
    }

    #[tokio::test]
    async fn test_coordinator_records_and_persists() {
        let store = Arc::new(MemoryProfileStore::new());
        store.save("default", &set_with_active("p1")).await.unwrap();

        let coordinator = EvolutionCoordinator::new(Arc::clone(&store), "default");
        let changed = coordinator
            .record_refinement(&event("p", "r", &["Rust"]))
            .await;

        assert!(changed);
        let stored = store.load("default").await.unwrap().unwrap();
        assert_eq!(stored.list[1].evolving_profile.usage_count, 1);
    }

    #[tokio::test]
    async fn test_coordinator_noop_without_record() {
        let store = Arc::new(MemoryProfileStore::new());
        let coordinator = EvolutionCoordinator::new(Arc::clone(&store), "default");

        let changed = coordinator
            .record_refinement(&event("p", "r", &["Rust"]))
            .await;

        assert!(!changed);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_coordinator_swallows_persistence_failure() {
        let store = Arc::new(MemoryProfileStore::new());
        store.save("default", &set_with_active("p1")).await.unwrap();
        store.inject_save_failure(true);

        let coordinator = EvolutionCoordinator::new(Arc::clone(&store), "default");
        // Must not panic or error; the merge still reports its change
        let changed = coordinator
            .record_refinement(&event("p", "r", &["Rust"]))
            .await;
        assert!(changed);
    }

    #[tokio::test]
    async fn test_detached_write_completes() {
        let store = Arc::new(MemoryProfileStore::new());
        store.save("default", &set_with_active("p1")).await.unwrap();

        let coordinator = Arc::new(EvolutionCoordinator::new(Arc::clone(&store), "default"));
        let handle = coordinator.record_refinement_detached(event("p", "r", &["Go"]));
        handle.await.unwrap();

        let stored = store.load("default").await.unwrap().unwrap();
        assert_eq!(stored.list[1].evolving_profile.topics[0].name, "Go");
    }

    #[tokio::test]
    async fn test_last_write_wins_race() {
        // Two coordinators read the same snapshot; the later save fully
        // overwrites the earlier one's deltas
        let store = Arc::new(MemoryProfileStore::new());
        store.save("default", &set_with_active("p1")).await.unwrap();

        let snapshot = store.load("default").await.unwrap().unwrap();
        let now = Utc::now();

        let a = evolve_profile(snapshot.clone(), Some(1), &event("pa", "r", &["Alpha"]), now);
        let b = evolve_profile(snapshot, Some(1), &event("pb", "r", &["Beta"]), now);

        store.save("default", &a.profile_set).await.unwrap();
        store.save("default", &b.profile_set).await.unwrap();

        let stored = store.load("default").await.unwrap().unwrap();
        let names: Vec<&str> = stored.list[1]
            .evolving_profile
            .topics
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Beta"]);
        assert_eq!(stored.list[1].evolving_profile.last_prompt, "pb");
    }
}
