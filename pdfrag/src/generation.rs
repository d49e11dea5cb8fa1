//! Text generation trait.

use async_trait::async_trait;

use crate::error::Result;

/// A text-completion service: prompt in, single completion string out.
///
/// The query pipeline bounds every call with its own timeout, so
/// implementations do not need to enforce one, but may map their own
/// transport timeouts to [`RagError::GenerationTimeout`](crate::RagError::GenerationTimeout).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt. Streaming is never used.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model used for generation.
    fn model(&self) -> &str;

    /// Models installed on the generation service.
    ///
    /// Used for health reporting. The default implementation reports only
    /// the configured model.
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(vec![self.model().to_string()])
    }
}
