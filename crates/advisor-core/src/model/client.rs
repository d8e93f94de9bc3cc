use async_trait::async_trait;

use crate::Result;

use super::types::CompletionRequest;

/// Completion client interface used by the advisor service.
///
/// Implementations make exactly one attempt per call and report every failure
/// (transport, timeout, non-2xx, malformed body, empty text) as an `Err`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, req: CompletionRequest) -> Result<String>;
}
