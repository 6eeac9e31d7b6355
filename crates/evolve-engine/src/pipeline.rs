//! End-to-end refinement pipeline.
//!
//! Ties the pieces together for one refinement call: ask the responder
//! for a refined prompt, normalize whatever comes back, then evolve and
//! persist the active profile without blocking the caller.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::coordinator::{EvolutionCoordinator, RefinementEvent};
use crate::normalize::{normalize_refinement, Refinement};
use crate::responder::Responder;
use evolve_storage::ProfileStore;

/// System prompt sent with every refinement request.
///
/// Asks for structured JSON, but nothing downstream relies on the model
/// honoring it.
pub const REFINEMENT_SYSTEM_PROMPT: &str = "You rewrite user prompts to be clearer, more \
specific, and better structured, without changing their intent. Reply with a JSON object: \
{\"refinedPrompt\": \"<the rewritten prompt>\", \"topics\": [\"<up to 10 short topical \
keywords>\"]}. Reply with the JSON object only.";

/// One refinement flow: responder, normalizer, coordinator.
pub struct RefinementPipeline<R, S> {
    responder: R,
    coordinator: Arc<EvolutionCoordinator<S>>,
}

impl<R: Responder, S: ProfileStore + 'static> RefinementPipeline<R, S> {
    /// Create a pipeline from a responder and a coordinator.
    pub fn new(responder: R, coordinator: Arc<EvolutionCoordinator<S>>) -> Self {
        Self {
            responder,
            coordinator,
        }
    }

    /// Refine one prompt.
    ///
    /// Always produces a result: a responder failure degrades to the
    /// original prompt with extracted topics. The profile evolution write
    /// is detached; the returned refinement does not wait for it.
    #[instrument(skip(self, prompt))]
    pub async fn refine(&self, prompt: &str) -> Refinement {
        let raw = match self
            .responder
            .respond(REFINEMENT_SYSTEM_PROMPT, prompt)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Responder failed, falling back to the original prompt");
                prompt.to_string()
            }
        };

        let refinement = normalize_refinement(&raw, prompt);
        self.coordinator
            .record_refinement_detached(RefinementEvent::from_refinement(prompt, &refinement));
        refinement
    }
}
