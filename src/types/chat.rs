//! Request-side chat types: messages, content parts and generation config.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataurl;
use crate::error::GenError;
use crate::schema::Schema;
use crate::types::tools::Tool;

/// Free-form string metadata attached to requests and responses.
pub type Metadata = HashMap<String, String>;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    Human,
    Ai,
    Tool,
}

/// One piece of message content.
///
/// Image and file parts carry a self-describing base64 data URL; see
/// [`crate::dataurl`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { data_url: String },
    File { data_url: String },
}

impl ContentPart {
    /// The text of a `Text` part; empty for media parts.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            _ => "",
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Vendor-issued call identifier.
    pub id: String,
    /// Name of the tool being invoked.
    pub name: String,
    /// Call arguments serialized as a JSON string.
    pub arguments: String,
}

/// The caller-supplied result of a previous tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Identifier of the originating [`ToolCall`].
    pub id: String,
    /// Name of the tool that produced the result.
    pub name: String,
    /// Result serialized as a string.
    pub result: String,
}

/// The body of a message.
///
/// A message is exactly one of plain content, a tool call, or a tool
/// response; the closed enum makes the invariant structural rather than a
/// runtime convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContent {
    Parts(Vec<ContentPart>),
    ToolCall(ToolCall),
    ToolResponse(ToolResponse),
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// A plain text message.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Parts(vec![ContentPart::Text { text: text.into() }]),
        }
    }

    /// A message combining text and an image read from a file path.
    ///
    /// The image is inlined as a data URL; the path's extension must map to
    /// an `image/*` MIME type. When `text` is empty an image-only message is
    /// returned.
    pub fn text_and_image(
        role: Role,
        text: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, GenError> {
        let (data_url, mime_type) = dataurl::encode_from_path(path)?;
        if !mime_type.starts_with("image/") {
            return Err(GenError::InvalidInput(format!("not an image: {mime_type}")));
        }

        let text = text.into();
        let mut parts = Vec::new();
        if !text.is_empty() {
            parts.push(ContentPart::Text { text });
        }
        parts.push(ContentPart::Image { data_url });

        Ok(Self {
            role,
            content: MessageContent::Parts(parts),
        })
    }

    /// An AI message carrying a tool call.
    pub fn tool_call(
        name: impl Into<String>,
        id: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Ai,
            content: MessageContent::ToolCall(ToolCall {
                id: id.into(),
                name: name.into(),
                arguments: arguments.into(),
            }),
        }
    }

    /// A tool message carrying the result of a previous call.
    pub fn tool_response(
        name: impl Into<String>,
        id: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::ToolResponse(ToolResponse {
                id: id.into(),
                name: name.into(),
                result: result.into(),
            }),
        }
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self.content, MessageContent::ToolCall(_))
    }

    pub fn is_tool_response(&self) -> bool {
        matches!(self.content, MessageContent::ToolResponse(_))
    }

    /// Concatenation of all text parts; empty for tool call/response messages.
    pub fn content_text(&self) -> String {
        match &self.content {
            MessageContent::Parts(parts) => {
                parts.iter().map(ContentPart::as_text).collect::<String>()
            }
            _ => String::new(),
        }
    }
}

/// Generation parameters; `None` means "unset, use the vendor default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

/// A provider-agnostic chat request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    /// Model identifier, resolved against the model catalog.
    pub model: String,
    #[serde(default)]
    pub config: GenerationConfig,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    /// Require the model to emit at least one tool call.
    #[serde(default)]
    pub must_call_tool: bool,
    /// JSON Schema constraining the output shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
}

impl Request {
    /// A request for the given model with an initial message list.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_must_call_tool(mut self, must: bool) -> Self {
        self.must_call_tool = must;
        self
    }

    pub fn with_response_schema(mut self, schema: Schema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}
