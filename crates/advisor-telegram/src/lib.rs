//! Telegram adapter (teloxide).
//!
//! Implements the `advisor-core` MessagingPort over the Telegram Bot API and
//! runs the polling dispatcher for inbound commands and admin replies.

use async_trait::async_trait;

use teloxide::{prelude::*, types::InputFile};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use advisor_core::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{MessagingCapabilities, OutgoingPhoto},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: &str) -> Self {
        Self::new(Bot::new(token))
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

/// `http(s)` references are fetched by Telegram; anything else is a file id.
fn remote_url(reference: &str) -> Option<reqwest::Url> {
    let url = reqwest::Url::parse(reference.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn input_file(photo: OutgoingPhoto) -> InputFile {
    match photo {
        OutgoingPhoto::LocalFile(path) => InputFile::file(path),
        OutgoingPhoto::Remote(reference) => match remote_url(&reference) {
            Some(url) => InputFile::url(url),
            None => InputFile::file_id(reference),
        },
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
            max_caption_len: 1024,
        }
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.with_retry(|| {
            self.bot
                .send_message(Self::tg_chat(chat_id), text.to_string())
        })
        .await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: OutgoingPhoto,
        caption: Option<&str>,
    ) -> Result<()> {
        let file = input_file(photo);
        self.with_retry(|| {
            let req = self.bot.send_photo(Self::tg_chat(chat_id), file.clone());
            match caption {
                Some(c) => req.caption(c.to_string()),
                None => req,
            }
        })
        .await?;
        Ok(())
    }
}
