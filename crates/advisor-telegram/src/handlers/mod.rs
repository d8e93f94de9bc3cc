//! Telegram update handlers.
//!
//! Precedence: `/start` and `/help` from anyone, then replies written by the
//! admin. Everything else is ignored.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::debug;

use advisor_core::domain::UserId;

use crate::router::AppState;

mod commands;
mod reply;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        if commands::handle_command(&bot, &msg, text).await? {
            return Ok(());
        }
    }

    let sender = msg.from().map(|u| UserId(u.id.0 as i64));
    if msg.reply_to_message().is_some() && state.notifier.is_admin(sender) {
        return reply::handle_admin_reply(msg, state).await;
    }

    debug!(chat = msg.chat.id.0, "ignoring message");
    Ok(())
}
