use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::Message;

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Upstream connection settings, resolved once at startup. The credential is
/// only ever written into the `x-api-key` header, never logged.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream API error {status}: {error_type}")]
    Api { status: u16, error_type: String },
}

// Anthropic Messages API request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
}

// One structured output block. Unknown fields ride along in `extra` so the
// blocks echo back to the client exactly as the upstream produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Error envelope on non-2xx responses: {"type":"error","error":{"type":...}}
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
}

pub struct UpstreamClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Relay a validated conversation to the completion API.
    ///
    /// The sole network call in the gateway. `max_tokens` must already be
    /// clamped by the validator; this layer sends it through untouched.
    pub async fn send(
        &self,
        messages: &[Message],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<MessagesResponse, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            MESSAGES_PATH
        );
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens,
            system: system.unwrap_or(""),
            messages,
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Pull the error type out of the envelope for the translator;
            // the rest of the body is deliberately not relayed to clients
            let error_type = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.error_type,
                Err(_) => "unknown_error".to_string(),
            };
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                error_type,
            });
        }

        Ok(response.json::<MessagesResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_carries_model_budget_and_conversation() {
        let messages = vec![Message {
            role: "user".to_string(),
            content: "hi".to_string(),
        }];
        let body = MessagesRequest {
            model: "claude-sonnet-4-6",
            max_tokens: 1000,
            system: "",
            messages: &messages,
        };

        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(
            encoded,
            json!({
                "model": "claude-sonnet-4-6",
                "max_tokens": 1000,
                "system": "",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn content_blocks_round_trip_unknown_fields() {
        let block: ContentBlock = serde_json::from_value(json!({
            "type": "tool_use",
            "id": "toolu_123",
            "name": "calculator"
        }))
        .unwrap();

        assert_eq!(block.kind, "tool_use");
        assert_eq!(block.text, None);

        let echoed = serde_json::to_value(&block).unwrap();
        assert_eq!(echoed["id"], "toolu_123");
        assert_eq!(echoed["name"], "calculator");
    }

    #[test]
    fn error_envelope_exposes_the_upstream_type() {
        let envelope: ErrorEnvelope = serde_json::from_value(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        }))
        .unwrap();
        assert_eq!(envelope.error.error_type, "overloaded_error");
    }
}
