//! The LLM responder seam.

use async_trait::async_trait;

use crate::error::EvolveError;

/// Trait for the external LLM collaborator.
///
/// Implementations handle transport, credentials, and rate limiting. The
/// returned text is untrusted: it may be plain text, bare JSON, fenced
/// JSON, or JSON embedded in prose, and the normalizer handles all four.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a raw completion for the given prompts.
    async fn respond(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, EvolveError>;
}

/// A responder that always fails, forcing keyword-only operation.
pub struct NoOpResponder;

#[async_trait]
impl Responder for NoOpResponder {
    async fn respond(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, EvolveError> {
        Err(EvolveError::Responder("no responder configured".to_string()))
    }
}
