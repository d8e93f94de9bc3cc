use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{debug, info, warn};

use advisor_core::notifier::Notifier;

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub notifier: Arc<Notifier>,
}

/// Long-poll Telegram until the dispatcher stops.
pub async fn run_polling(bot: Bot, notifier: Arc<Notifier>) -> anyhow::Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            bot = %me.username(),
            admin = notifier.admin().0,
            "telegram polling started"
        ),
        Err(e) => warn!(error = %e, "get_me failed, polling anyway"),
    }

    let state = Arc::new(AppState { notifier });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            debug!(update_id = ?upd.id, "ignoring unsupported update");
        })
        .build()
        .dispatch()
        .await;

    Ok(())
}
