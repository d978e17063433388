//! Response-side chat types: finish reasons, usage accounting and the
//! aggregated response.

use serde::{Deserialize, Serialize};

use crate::types::chat::{Message, Metadata, Role};

/// Why generation stopped.
///
/// Every vendor finish reason maps to exactly one variant through a fixed
/// per-adapter table; unrecognized vendor values collapse to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    ToolUse,
    Safety,
    Error,
    #[default]
    Unknown,
}

/// Token accounting for one generation.
///
/// `cost` is derived by the model catalog from per-token rates, not reported
/// by vendors; it stays zero when the model is absent from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    #[serde(default)]
    pub reasoning_tokens: u32,
    #[serde(default)]
    pub cache_creation_tokens: u32,
    #[serde(default)]
    pub cached_tokens: u32,
    pub total_tokens: u32,
    #[serde(default)]
    pub cost: f64,
}

/// The unified result of one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// The model name as requested.
    pub model: String,
    pub finish_reason: FinishReason,
    /// Ordered output: at most one text message plus one message per tool call.
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Response {
    /// AI tool-call messages in emission order.
    pub fn tool_calls(&self) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Ai && m.is_tool_call())
            .collect()
    }

    /// Concatenated text of all output messages.
    pub fn text(&self) -> String {
        self.messages.iter().map(|m| m.content_text()).collect()
    }
}
