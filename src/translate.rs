use crate::error::GatewayError;
use crate::metrics::UPSTREAM_ERRORS_TOTAL;
use crate::models::ChatReply;
use crate::upstream::{ContentBlock, MessagesResponse, UpstreamError};

/// Normalize the outcome of an upstream call into the client contract.
pub fn translate(result: Result<MessagesResponse, UpstreamError>) -> Result<ChatReply, GatewayError> {
    match result {
        Ok(response) => {
            let reply = extract_reply(&response.content);
            if reply.is_empty() {
                // an empty completion is never a valid success
                UPSTREAM_ERRORS_TOTAL.inc();
                return Err(GatewayError::EmptyReply);
            }
            Ok(ChatReply {
                reply,
                content: response.content,
            })
        }
        Err(err) => {
            UPSTREAM_ERRORS_TOTAL.inc();
            Err(translate_failure(err))
        }
    }
}

fn translate_failure(err: UpstreamError) -> GatewayError {
    match err {
        UpstreamError::Api { status, error_type } => {
            if status == 429 || error_type == "rate_limit_error" {
                tracing::warn!(status, "upstream rate limit hit");
                GatewayError::UpstreamRateLimited
            } else {
                tracing::warn!(status, error_type = error_type.as_str(), "upstream API error");
                GatewayError::Api { error_type }
            }
        }
        UpstreamError::Transport(err) => {
            tracing::error!(error = %err, "failed to reach upstream");
            GatewayError::Internal
        }
    }
}

// Plain text of the completion: text blocks only, newline-joined, trimmed
fn extract_reply(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
