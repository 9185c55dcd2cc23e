mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod rate_limit;
mod state;
mod translate;
mod upstream;
mod validate;

use axum::response::IntoResponse;
use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::Args;
use crate::error::GatewayError;
use crate::handlers::{chat_handler, health_handler, metrics_handler, method_not_allowed};
use crate::rate_limit::InMemoryRateStore;
use crate::state::AppState;
use crate::upstream::{UpstreamClient, UpstreamConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // parse cli arguments
    let args = Args::parse();

    // The credential is the one piece of config that never goes on the
    // command line; it is read here once and handed to the upstream client
    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or("ANTHROPIC_API_KEY environment variable must be set")?;

    // creating shared state
    let state = Arc::new(AppState {
        upstream: UpstreamClient::new(UpstreamConfig {
            base_url: args.upstream_url.clone(),
            api_key,
            model: args.model.clone(),
        }),
        rate_limiter: Arc::new(InMemoryRateStore::new(
            args.rate_limit,
            Duration::from_secs(args.rate_window),
        )),
    });

    // creating the router with routes; non-POST on the chat route falls
    // through to the 405 handler, and panics still answer with server_error
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/chat", post(chat_handler).fallback(method_not_allowed))
        .layer(CatchPanicLayer::custom(
            |_: Box<dyn std::any::Any + Send + 'static>| GatewayError::Internal.into_response(),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Gateway running on http://localhost:{}", args.port);
    tracing::info!("Forwarding to {} (model {})", args.upstream_url, args.model);
    tracing::info!(
        "Rate limit: {} requests per {} seconds per client",
        args.rate_limit,
        args.rate_window
    );

    axum::serve(listener, app).await?;

    Ok(())
}
