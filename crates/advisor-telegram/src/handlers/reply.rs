use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info};

use advisor_core::{
    domain::ChatId,
    notifier::{AdminReply, ReplyOutcome},
};

use crate::router::AppState;

fn body(msg: &Message) -> Option<String> {
    msg.text().or_else(|| msg.caption()).map(str::to_string)
}

pub async fn handle_admin_reply(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(replied) = msg.reply_to_message() else {
        return Ok(());
    };

    let reply = AdminReply {
        chat_id: ChatId(msg.chat.id.0),
        replied_to: body(replied),
        text: body(&msg),
    };

    match state.notifier.relay_admin_reply(reply).await {
        Ok(ReplyOutcome::Delivered { .. }) => {}
        Ok(outcome) => info!(?outcome, "admin reply not delivered"),
        // Notices to the admin failed too; nothing left to tell anyone.
        Err(e) => error!(error = %e, "admin reply handling failed"),
    }
    Ok(())
}
