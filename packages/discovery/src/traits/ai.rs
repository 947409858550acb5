//! AI trait for LLM text generation.

use async_trait::async_trait;

use crate::error::Result;

/// Free-text generation capability.
///
/// Callers treat the returned text as untrusted and validate it themselves.
/// Implementations must report quota exhaustion as
/// [`DiscoveryError::RateLimited`](crate::error::DiscoveryError::RateLimited)
/// and every other failure as something else; the pipeline only retries the
/// former.
#[async_trait]
pub trait AI: Send + Sync {
    /// Complete a prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
