use std::{path::PathBuf, sync::Arc};

use tracing::{info, warn};

use crate::{
    advisory::AdvisoryRequest,
    domain::{ChatId, UserId},
    messaging::{
        port::MessagingPort,
        types::{truncate_chars, OutgoingPhoto},
    },
    photo::PhotoRef,
    report::{extract_requester, photo_caption, AdminReport},
    Result,
};

const SUPPORT_REPLY_HEADER: &str = "👨‍🌾 پاسخ پشتیبان:";
const REQUESTER_NOT_FOUND: &str = "آی‌دی کاربر پیدا نشد.";
const REPLY_DELIVERED: &str = "✅ پاسخ ارسال شد.";
const EMPTY_REPLY: &str = "فقط پاسخ متنی قابل ارسال است.";

/// An admin message that replies to an earlier bot message.
#[derive(Clone, Debug)]
pub struct AdminReply {
    /// Chat the reply was written in; notices go back here.
    pub chat_id: ChatId,
    /// Text (or caption) of the message being replied to.
    pub replied_to: Option<String>,
    /// Text (or caption) of the reply itself.
    pub text: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    Delivered { requester: UserId },
    RequesterNotFound,
    EmptyReply,
    DeliveryFailed { requester: UserId },
}

/// Forwards failed requests to the administrator and relays the answers back.
pub struct Notifier {
    messenger: Arc<dyn MessagingPort>,
    admin: UserId,
    temp_dir: PathBuf,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn MessagingPort>, admin: UserId, temp_dir: PathBuf) -> Self {
        Self {
            messenger,
            admin,
            temp_dir,
        }
    }

    pub fn admin(&self) -> UserId {
        self.admin
    }

    pub fn is_admin(&self, user: Option<UserId>) -> bool {
        user == Some(self.admin)
    }

    /// Send the report text, then every photo, to the administrator.
    ///
    /// Photo decoding and delivery errors are returned as-is; photos after a
    /// failing one are not sent.
    pub async fn notify_admin(&self, req: &AdvisoryRequest, reason: &str) -> Result<()> {
        let admin = ChatId::from(self.admin);
        let caps = self.messenger.capabilities();

        let report = AdminReport::build(req, reason).truncated(caps.max_message_len);
        self.messenger.send_text(admin, &report.text).await?;

        let total = req.photos.len();
        for (idx, raw) in req.photos.iter().enumerate() {
            let caption = truncate_chars(
                &photo_caption(req.requester(), idx, total),
                caps.max_caption_len,
            );
            self.send_photo(admin, raw, &caption).await?;
        }

        info!(
            requester = req.user_id,
            photos = total,
            reason,
            "forwarded advisory request to admin"
        );
        Ok(())
    }

    async fn send_photo(&self, admin: ChatId, raw: &str, caption: &str) -> Result<()> {
        match PhotoRef::parse(raw)? {
            PhotoRef::Remote(reference) => {
                self.messenger
                    .send_photo(admin, OutgoingPhoto::Remote(reference), Some(caption))
                    .await?;
            }
            PhotoRef::Embedded(img) => {
                let tmp = img.write_temp(&self.temp_dir).await?;
                let sent = self
                    .messenger
                    .send_photo(
                        admin,
                        OutgoingPhoto::LocalFile(tmp.path().to_path_buf()),
                        Some(caption),
                    )
                    .await;
                // Delete before surfacing a send error.
                let cleanup = tmp.close();
                sent?;
                cleanup?;
            }
        }
        Ok(())
    }

    /// Route an admin reply to the requester tagged in the replied-to message.
    pub async fn relay_admin_reply(&self, reply: AdminReply) -> Result<ReplyOutcome> {
        let Some(requester) = reply.replied_to.as_deref().and_then(extract_requester) else {
            self.messenger
                .send_text(reply.chat_id, REQUESTER_NOT_FOUND)
                .await?;
            return Ok(ReplyOutcome::RequesterNotFound);
        };

        let Some(text) = reply.text.as_deref().filter(|t| !t.trim().is_empty()) else {
            self.messenger.send_text(reply.chat_id, EMPTY_REPLY).await?;
            return Ok(ReplyOutcome::EmptyReply);
        };

        let max = self.messenger.capabilities().max_message_len;
        let body = truncate_chars(&format!("{SUPPORT_REPLY_HEADER}\n{text}"), max);

        if let Err(e) = self.messenger.send_text(ChatId::from(requester), &body).await {
            warn!(requester = requester.0, error = %e, "admin reply delivery failed");
            let notice = truncate_chars(&format!("❌ ارسال پاسخ به کاربر ناموفق بود: {e}"), max);
            self.messenger.send_text(reply.chat_id, &notice).await?;
            return Ok(ReplyOutcome::DeliveryFailed { requester });
        }

        self.messenger
            .send_text(reply.chat_id, REPLY_DELIVERED)
            .await?;
        info!(requester = requester.0, "relayed admin reply");
        Ok(ReplyOutcome::Delivered { requester })
    }
}
