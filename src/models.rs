use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::upstream::ContentBlock;

// Inbound chat request body.
//
// `messages` and `system` stay untyped here so the validator owns the shape
// checks and can answer with its own error codes instead of a decode failure.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Value>,
    #[serde(default)]
    pub system: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

// A validated conversation turn, relayed upstream verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// A `ChatRequest` that passed validation. `max_tokens` is already clamped,
/// so holding this type is proof the upstream call stays within budget.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidChatRequest {
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub max_tokens: u32,
}

// Successful gateway response: the extracted reply text plus the raw
// upstream content blocks for clients that want the structured form
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub content: Vec<ContentBlock>,
}
