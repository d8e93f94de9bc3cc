use async_trait::async_trait;

use crate::{
    domain::ChatId,
    messaging::types::{MessagingCapabilities, OutgoingPhoto},
    Result,
};

/// Messenger port used by the notifier.
///
/// Implementations deliver plain text (no markup parsing), since report bodies
/// carry unescaped user input.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: OutgoingPhoto,
        caption: Option<&str>,
    ) -> Result<()>;
}
