use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    advisory::{build_completion_request, AdvisoryRequest, AdvisoryResult, Analysis},
    errors::Error,
    model::client::CompletionClient,
    notifier::Notifier,
    report::NO_API_KEY,
    Result,
};

/// Request handler: AI first, administrator as the fallback.
pub struct AdvisorService {
    completion: Option<Arc<dyn CompletionClient>>,
    notifier: Arc<Notifier>,
    language: String,
}

impl AdvisorService {
    /// `completion` is `None` when no AI key is configured.
    pub fn new(
        completion: Option<Arc<dyn CompletionClient>>,
        notifier: Arc<Notifier>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            completion,
            notifier,
            language: language.into(),
        }
    }

    /// Handle one advisory request.
    ///
    /// Every AI-side failure is absorbed into `AdvisoryResult::failed()` after
    /// the request was forwarded. `Err` means the forwarding itself failed.
    pub async fn analyze(&self, req: &AdvisoryRequest) -> Result<AdvisoryResult> {
        let Some(client) = &self.completion else {
            debug!(requester = req.user_id, "no AI key configured, forwarding to admin");
            self.notifier.notify_admin(req, NO_API_KEY).await?;
            return Ok(AdvisoryResult::failed());
        };

        let completion = build_completion_request(req, &self.language);
        let outcome = client.complete(completion).await.and_then(|text| {
            if text.trim().is_empty() {
                Err(Error::External("ai returned empty text".to_string()))
            } else {
                Ok(text)
            }
        });

        match outcome {
            Ok(text) => Ok(AdvisoryResult::answered(Analysis::from_completion(&text))),
            Err(e) => {
                warn!(requester = req.user_id, error = %e, "ai completion failed, forwarding to admin");
                self.notifier.notify_admin(req, &e.to_string()).await?;
                Ok(AdvisoryResult::failed())
            }
        }
    }
}
