use async_trait::async_trait;

use crate::domain::DomainError;

/// A web-grounded language model that answers a prompt with free text.
///
/// Implementations return the text content of the first completion. Missing
/// credentials surface as [`DomainError::Configuration`], upstream failures
/// as [`DomainError::Upstream`].
#[async_trait]
pub trait SearchCompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
