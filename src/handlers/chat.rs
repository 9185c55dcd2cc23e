use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::Json;
use std::sync::Arc;
use std::time::Instant;

use crate::error::GatewayError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL, TRACKED_CLIENTS};
use crate::models::{ChatReply, ChatRequest};
use crate::state::AppState;
use crate::translate::translate;
use crate::validate::validate;

// Client identity for throttling: forwarded address first, then the direct
// peer header, then a shared bucket. Client-supplied, so spoofable; this is
// coarse abuse throttling, not a security boundary.
fn client_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, GatewayError> {
    REQUEST_TOTAL.inc();

    let client = client_key(&headers);
    if !state.rate_limiter.admit(&client) {
        RATE_LIMITED_TOTAL.inc();
        tracing::warn!(%client, "rate limit reached");
        return Err(GatewayError::RateLimited);
    }
    TRACKED_CLIENTS.set(state.rate_limiter.tracked_clients() as f64);

    // A body that isn't valid JSON never reached our validation, so it
    // surfaces as server_error rather than a validation code
    let Json(request) = payload.map_err(|err| {
        tracing::warn!(%client, error = %err, "request body failed to decode");
        GatewayError::Internal
    })?;

    let request = validate(&request)?;

    let start_time = Instant::now();
    let result = state
        .upstream
        .send(
            &request.messages,
            request.system.as_deref(),
            request.max_tokens,
        )
        .await;
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    translate(result).map(Json)
}

// Fallback for non-POST methods on the chat route
pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}
