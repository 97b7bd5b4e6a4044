//! Text generation collaborator trait.

use async_trait::async_trait;

use crate::error::GenerationError;

/// External text-generation service: prompt in, text out, or failure.
///
/// Implementations must report an empty completion as
/// [`GenerationError::EmptyResponse`] rather than returning `""`, so callers
/// never insert nothing while claiming success.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generator ID.
    fn id(&self) -> &str;

    /// Generate text for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
