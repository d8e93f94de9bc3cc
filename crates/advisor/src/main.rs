use std::sync::Arc;

use tokio::{sync::watch, task::JoinError};
use tracing::{error, info, warn};

use advisor_core::{
    config::Config, domain::UserId, messaging::port::MessagingPort,
    model::client::CompletionClient, notifier::Notifier, service::AdvisorService,
};
use advisor_http::AppState;
use advisor_openai::OpenAiClient;
use advisor_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    advisor_core::logging::init("advisor")?;

    let cfg = Arc::new(Config::load()?);

    let telegram = TelegramMessenger::from_token(&cfg.telegram_bot_token);
    let bot = telegram.bot();
    let messenger: Arc<dyn MessagingPort> = Arc::new(telegram);
    let notifier = Arc::new(Notifier::new(
        messenger,
        UserId(cfg.admin_id),
        cfg.temp_dir.clone(),
    ));

    let completion: Option<Arc<dyn CompletionClient>> = match &cfg.ai_api_key {
        Some(key) => {
            let client = OpenAiClient::new(
                cfg.ai_api_url.clone(),
                key.clone(),
                cfg.ai_model.clone(),
                cfg.ai_timeout,
            )?;
            info!(endpoint = %cfg.ai_api_url, model = %cfg.ai_model, "AI completions enabled");
            Some(Arc::new(client) as Arc<dyn CompletionClient>)
        }
        None => {
            info!("AI_API_KEY not set; every request is forwarded to the admin");
            None
        }
    };
    let advisor = Arc::new(AdvisorService::new(
        completion,
        notifier.clone(),
        cfg.ai_response_language.clone(),
    ));

    // Flipped once on ctrl-c / SIGTERM so the HTTP server drains.
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let state = Arc::new(AppState { advisor });
    let router = advisor_http::router(
        state,
        &cfg.cors_allowed_origins,
        cfg.http_max_body_bytes,
    );
    let shutdown = async move {
        let _ = stop_rx.changed().await;
    };
    let mut http = tokio::spawn(advisor_http::serve(cfg.http_bind_addr, router, shutdown));
    let mut polling = tokio::spawn(advisor_telegram::router::run_polling(bot, notifier));

    let outcome = tokio::select! {
        res = &mut http => task_exit("http server", res),
        res = &mut polling => task_exit("telegram polling", res),
        () = shutdown_signal() => Ok(()),
    };

    let _ = stop_tx.send(true);
    polling.abort();
    if !http.is_finished() {
        if let Err(e) = http.await {
            if !e.is_cancelled() {
                warn!(error = %e, "http server did not shut down cleanly");
            }
        }
    }

    info!("advisor stopped");
    outcome
}

fn task_exit(name: &str, res: Result<anyhow::Result<()>, JoinError>) -> anyhow::Result<()> {
    match res {
        Ok(Ok(())) => {
            warn!(task = name, "task exited");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(task = name, error = %e, "task failed");
            Err(e)
        }
        Err(e) => {
            error!(task = name, error = %e, "task panicked or was cancelled");
            Err(anyhow::anyhow!("{name} task aborted: {e}"))
        }
    }
}

/// Wait for SIGINT (ctrl-c) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM handler unavailable, relying on ctrl-c");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c"),
        () = terminate => info!("received SIGTERM"),
    }
}
