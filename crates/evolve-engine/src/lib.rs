//! # evolve-engine
//!
//! The topic evolution core: turns free-form text and untrusted model
//! output into a bounded, ranked, decaying set of affinity topics per
//! user profile.
//!
//! ## Features
//! - Candidate topic extraction via tokenization and frequency ranking
//! - Normalization of raw LLM replies (plain text, bare/fenced/embedded
//!   JSON) into a structured refinement result
//! - Frequency + time-decay scoring with capacity-bounded eviction
//! - A coordinator that merges one refinement event into the active
//!   profile and persists the whole record (last-write-wins)
//!
//! Extraction and normalization are pure and never fail; all data-shape
//! problems degrade to fallbacks rather than errors.

pub mod casing;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod extraction;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod responder;
pub mod scoring;

pub use casing::display_case;
pub use config::{EvolutionConfig, ScoringConfig};
pub use coordinator::{
    apply_manual_topics, evolve_profile, evolve_profile_with, EvolutionCoordinator, EvolveOutcome,
    RefinementEvent,
};
pub use error::EvolveError;
pub use extraction::{extract_candidate_topics, extract_candidate_topics_from};
pub use merge::{merge_topics, MergeOutcome};
pub use normalize::{normalize_refinement, Refinement};
pub use pipeline::RefinementPipeline;
pub use responder::{NoOpResponder, Responder};
pub use scoring::AffinityScorer;
