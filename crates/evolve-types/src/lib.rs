//! # evolve-types
//!
//! Shared domain types for the topic evolution engine.
//!
//! This crate defines the persisted record shapes:
//! - Topics: ranked affinity keywords with frequency counts and timestamps
//! - EvolvingProfile: the bounded, decaying topic set tracked per profile
//! - Profile / ProfileSet: the surrounding records the engine stores into
//!
//! Persisted JSON is untrusted: topics may arrive as legacy bare strings
//! and whole records may be malformed. Everything here coerces rather than
//! fails on load.

pub mod profile;
pub mod topic;

pub use profile::{EvolvingProfile, Profile, ProfileSet};
pub use topic::{truncate_prompt, Topic};

/// Maximum number of affinity topics retained per profile.
pub const TOPIC_CAPACITY: usize = 10;

/// Maximum stored length of the last-seen prompt, in characters.
pub const MAX_PROMPT_CHARS: usize = 200;
