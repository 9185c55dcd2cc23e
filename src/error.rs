use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::validate::ValidationError;

/// Everything the gateway can answer with other than a successful reply.
///
/// Each variant renders to the stable `{error: ...}` JSON contract; upstream
/// detail beyond the error-type string never reaches the client.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Rejected by this gateway's own limiter.
    #[error("client rate limit exceeded")]
    RateLimited,

    /// The upstream API reported rate limiting.
    #[error("upstream rate limit exceeded")]
    UpstreamRateLimited,

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Upstream failure other than rate limiting.
    #[error("upstream API error: {error_type}")]
    Api { error_type: String },

    /// Upstream succeeded but produced no usable text.
    #[error("upstream returned an empty reply")]
    EmptyReply,

    /// Anything unexpected: malformed body, network failure, panic.
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GatewayError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({"error": "method_not_allowed"}),
            ),
            GatewayError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": "rate_limit_reached",
                    "message": "Too many requests. Please wait an hour before trying again.",
                }),
            ),
            GatewayError::UpstreamRateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": "rate_limit_reached",
                    "message": "The assistant is receiving too many requests right now. Please try again in a moment.",
                }),
            ),
            GatewayError::Validation(err) => {
                (StatusCode::BAD_REQUEST, json!({"error": err.code()}))
            }
            GatewayError::Api { error_type } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "api_error", "type": error_type}),
            ),
            GatewayError::EmptyReply => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "empty_reply"}),
            ),
            GatewayError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "server_error"}),
            ),
        };
        (status, Json(body)).into_response()
    }
}
