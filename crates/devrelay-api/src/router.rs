//! Router configuration and server setup.

use std::future::Future;
use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use devrelay_core::WEBHOOK_PATH;

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

/// Creates the relay router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route(WEBHOOK_PATH, post(handlers::telegram_webhook))
        .route("/api/command", post(handlers::send_command))
        .route("/health", get(handlers::health))
        .route("/ws/reporter", get(handlers::reporter_socket))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Starts the relay server and runs until `shutdown` resolves.
///
/// Reporter sockets are asked to close as soon as shutdown begins.
pub async fn serve<F>(config: ApiConfig, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Relay listening on {}", addr);

    let hub = Arc::clone(&state.hub);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            hub.close();
        })
        .await
}
