//! HTTP surface for the mini-app.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use advisor_core::{
    advisory::{AdvisoryRequest, AdvisoryResult},
    service::AdvisorService,
};

pub mod error;

use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<AdvisorService>,
}

pub fn router(state: Arc<AppState>, cors_origins: &[String], max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_origins))
        .with_state(state)
}

/// Serve `router` on `addr` until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "http server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdvisoryRequest>,
) -> Result<Json<AdvisoryResult>, ApiError> {
    // Detached so a client hanging up does not cancel the admin fallback.
    let advisor = state.advisor.clone();
    let result = tokio::spawn(async move { advisor.analyze(&req).await }).await??;
    Ok(Json(result))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Any origin by default (mirrored so credentials stay allowed).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(origin = %o, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
