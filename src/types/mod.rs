//! Unified chat model shared by every provider adapter.

mod chat;
mod response;
mod tools;

pub use chat::{
    ContentPart, GenerationConfig, Message, MessageContent, Metadata, Request, Role, ToolCall,
    ToolResponse,
};
pub use response::{FinishReason, Response, Usage};
pub use tools::Tool;
