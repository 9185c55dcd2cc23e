use serde_json::Value;
use thiserror::Error;

use crate::models::{ChatRequest, Message, ValidChatRequest};

// Bounds on what a single request may cost us upstream
pub const MAX_MESSAGES: usize = 40;
pub const MAX_INPUT_CHARS: usize = 2000;
pub const MAX_TOKENS_CAP: u32 = 2500;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("messages must be a non-empty array")]
    InvalidFormat,
    #[error("conversation has too many messages")]
    HistoryTooLong,
    #[error("message role must be \"user\" or \"assistant\"")]
    InvalidRole,
    #[error("message content must be a non-empty string")]
    InvalidContent,
    #[error("message content is too long")]
    MessageTooLong,
    #[error("system prompt must be a string")]
    InvalidSystemPrompt,
}

impl ValidationError {
    /// Stable error code used in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidFormat => "invalid_format",
            ValidationError::HistoryTooLong => "history_too_long",
            ValidationError::InvalidRole => "invalid_role",
            ValidationError::InvalidContent => "invalid_content",
            ValidationError::MessageTooLong => "message_too_long",
            ValidationError::InvalidSystemPrompt => "invalid_system_prompt",
        }
    }
}

/// Check conversation shape and size bounds before any network call is made.
///
/// Checks run in order and stop at the first failure. On success the request
/// comes back typed, with `max_tokens` clamped to [`MAX_TOKENS_CAP`].
pub fn validate(request: &ChatRequest) -> Result<ValidChatRequest, ValidationError> {
    let messages = request
        .messages
        .as_ref()
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
        .ok_or(ValidationError::InvalidFormat)?;

    if messages.len() > MAX_MESSAGES {
        return Err(ValidationError::HistoryTooLong);
    }

    let mut conversation = Vec::with_capacity(messages.len());
    for message in messages {
        let role = message
            .get("role")
            .and_then(Value::as_str)
            .filter(|role| !role.is_empty())
            .ok_or(ValidationError::InvalidRole)?;
        if role != "user" && role != "assistant" {
            return Err(ValidationError::InvalidRole);
        }

        let content = message
            .get("content")
            .and_then(Value::as_str)
            .filter(|content| !content.is_empty())
            .ok_or(ValidationError::InvalidContent)?;
        if content.chars().count() > MAX_INPUT_CHARS {
            return Err(ValidationError::MessageTooLong);
        }

        conversation.push(Message {
            role: role.to_string(),
            content: content.to_string(),
        });
    }

    // JSON null counts as absent, same as a missing field
    let system = match request.system.as_ref().filter(|value| !value.is_null()) {
        Some(value) => Some(
            value
                .as_str()
                .ok_or(ValidationError::InvalidSystemPrompt)?
                .to_string(),
        ),
        None => None,
    };

    // Cap the token budget so no single request can be too expensive;
    // a zero budget counts as unset
    let max_tokens = request
        .max_tokens
        .filter(|&tokens| tokens > 0)
        .unwrap_or(DEFAULT_MAX_TOKENS)
        .min(MAX_TOKENS_CAP);

    Ok(ValidChatRequest {
        messages: conversation,
        system,
        max_tokens,
    })
}
