//! Fakes for the ports, shared by unit tests in this crate.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{MessagingCapabilities, OutgoingPhoto},
    },
    model::{client::CompletionClient, types::CompletionRequest},
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
    },
    Photo {
        chat_id: ChatId,
        photo: OutgoingPhoto,
        caption: Option<String>,
        /// Contents of a local file at the moment of sending.
        file_bytes: Option<Vec<u8>>,
    },
}

/// Records deliveries. Failed text sends are not recorded; photo sends are
/// recorded even when configured to fail.
#[derive(Default)]
pub struct FakeMessenger {
    pub fail_text_to: Option<ChatId>,
    pub fail_photos: bool,
    pub sent: Mutex<Vec<Sent>>,
}

impl FakeMessenger {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<(ChatId, String)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat_id, text } => Some((chat_id, text)),
                Sent::Photo { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
            max_caption_len: 1024,
        }
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        if self.fail_text_to == Some(chat_id) {
            return Err(Error::External("telegram error: chat not found".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: OutgoingPhoto,
        caption: Option<&str>,
    ) -> Result<()> {
        let file_bytes = match &photo {
            OutgoingPhoto::LocalFile(path) => std::fs::read(path).ok(),
            OutgoingPhoto::Remote(_) => None,
        };
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            photo,
            caption: caption.map(String::from),
            file_bytes,
        });
        if self.fail_photos {
            return Err(Error::External("telegram error: wrong file".to_string()));
        }
        Ok(())
    }
}

/// Completion client returning a canned answer or error.
pub struct FakeCompletion {
    pub answer: std::result::Result<String, String>,
    pub calls: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn ok(text: &str) -> Self {
        Self {
            answer: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            answer: Err(msg.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(req);
        self.answer.clone().map_err(Error::External)
    }
}
